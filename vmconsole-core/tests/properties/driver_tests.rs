//! Property tests for the fallback driver state machine

use proptest::prelude::*;
use vmconsole_core::driver::{DriverState, DriverStep, FallbackDriver};
use vmconsole_core::error::ConsoleError;
use vmconsole_core::guard::AttemptOutcome;
use vmconsole_core::models::{ConnectionDetails, ConsoleOption, Html5Details};

fn options(count: usize) -> Vec<ConsoleOption> {
    (0..count)
        .map(|i| {
            ConsoleOption::new(ConnectionDetails::Html5(Html5Details {
                url: format!("https://console.example.com/{i}"),
            }))
        })
        .collect()
}

fn outcome_strategy() -> impl Strategy<Value = AttemptOutcome> {
    prop_oneof![
        Just(AttemptOutcome::Succeeded),
        Just(AttemptOutcome::Ended),
        "[a-z ]{1,16}".prop_map(|r| AttemptOutcome::Failed(ConsoleError::HandshakeFailed(r))),
        "[a-z ]{1,16}".prop_map(|r| AttemptOutcome::Failed(ConsoleError::SecurityFailure(r))),
    ]
}

proptest! {
    /// Property: the cursor never decreases and never exceeds the list
    /// length, whatever outcomes arrive
    #[test]
    fn cursor_is_monotonic_and_bounded(
        len in 0usize..6,
        outcomes in proptest::collection::vec(outcome_strategy(), 0..12),
    ) {
        let mut driver = FallbackDriver::new(options(len));
        driver.start();

        let mut previous_cursor = driver.cursor();
        for outcome in outcomes {
            driver.on_outcome(outcome);
            prop_assert!(driver.cursor() >= previous_cursor);
            prop_assert!(driver.cursor() <= len);
            previous_cursor = driver.cursor();
        }
    }

    /// Property: attempt indices are issued strictly in order, at most
    /// once per option
    #[test]
    fn each_option_is_attempted_at_most_once(
        len in 1usize..6,
        outcomes in proptest::collection::vec(outcome_strategy(), 0..12),
    ) {
        let mut driver = FallbackDriver::new(options(len));
        let mut attempts = Vec::new();

        if let DriverStep::Attempt(index) = driver.start() {
            attempts.push(index);
        }
        for outcome in outcomes {
            if let DriverStep::Attempt(index) = driver.on_outcome(outcome) {
                attempts.push(index);
            }
        }

        prop_assert!(attempts.len() <= len);
        let expected: Vec<usize> = (0..attempts.len()).collect();
        prop_assert_eq!(attempts, expected);
    }

    /// Property: terminal states absorb every further outcome unchanged
    #[test]
    fn terminal_states_are_absorbing(
        len in 0usize..4,
        prefix in proptest::collection::vec(outcome_strategy(), 0..10),
        suffix in proptest::collection::vec(outcome_strategy(), 1..6),
    ) {
        let mut driver = FallbackDriver::new(options(len));
        driver.start();
        for outcome in prefix {
            driver.on_outcome(outcome);
        }

        if driver.state().is_terminal() {
            let state = driver.state();
            let last_error = driver.last_error().map(str::to_string);
            for outcome in suffix {
                prop_assert_eq!(driver.on_outcome(outcome), DriverStep::Ignore);
                prop_assert_eq!(driver.state(), state);
                prop_assert_eq!(driver.last_error(), last_error.as_deref());
            }
        }
    }

    /// Property: once connected, the driver never issues another attempt
    #[test]
    fn connected_stops_fallback_for_good(
        len in 1usize..6,
        failures_before in 0usize..5,
        suffix in proptest::collection::vec(outcome_strategy(), 0..8),
    ) {
        let failures_before = failures_before.min(len - 1);
        let mut driver = FallbackDriver::new(options(len));
        driver.start();

        for i in 0..failures_before {
            let step = driver.on_outcome(AttemptOutcome::Failed(
                ConsoleError::HandshakeFailed(format!("failure {i}")),
            ));
            prop_assert!(matches!(step, DriverStep::Attempt(_)));
        }
        let step = driver.on_outcome(AttemptOutcome::Succeeded);
        prop_assert!(matches!(step, DriverStep::Connected(_)));

        for outcome in suffix {
            let step = driver.on_outcome(outcome);
            prop_assert!(!matches!(step, DriverStep::Attempt(_)));
        }
    }

    /// Property: failing every option exhausts with the last reason
    #[test]
    fn all_failures_exhaust_with_last_reason(len in 1usize..6) {
        let mut driver = FallbackDriver::new(options(len));
        driver.start();

        let mut last_step = DriverStep::Ignore;
        for i in 0..len {
            last_step = driver.on_outcome(AttemptOutcome::Failed(
                ConsoleError::HandshakeFailed(format!("reason {i}")),
            ));
        }

        let expected = ConsoleError::HandshakeFailed(format!("reason {}", len - 1)).to_string();
        prop_assert_eq!(last_step, DriverStep::Exhausted(expected.clone()));
        prop_assert_eq!(driver.state(), DriverState::Exhausted);
        prop_assert_eq!(driver.last_error(), Some(expected.as_str()));
        prop_assert_eq!(driver.cursor(), len);
    }

    /// Property: close from any non-terminal state closes exactly once
    #[test]
    fn close_closes_once(
        len in 0usize..5,
        outcomes in proptest::collection::vec(outcome_strategy(), 0..8),
    ) {
        let mut driver = FallbackDriver::new(options(len));
        driver.start();
        for outcome in outcomes {
            driver.on_outcome(outcome);
        }

        let was_terminal = driver.state().is_terminal();
        let step = driver.on_close();
        if was_terminal {
            prop_assert_eq!(step, DriverStep::Ignore);
        } else {
            prop_assert_eq!(step, DriverStep::Closed { error: None });
        }
        prop_assert_eq!(driver.on_close(), DriverStep::Ignore);
        prop_assert!(driver.state().is_terminal());
    }
}

//! Fallback driver
//!
//! Walks the ordered console option list: one attempt per option, advance
//! on failure, stop on the first success. The driver is a synchronous
//! state machine; the session task executes the steps it returns (mount an
//! option, publish a status, tear everything down). Keeping it free of I/O
//! makes the transition rules directly testable.

use crate::error::ConsoleError;
use crate::guard::AttemptOutcome;
use crate::models::{ConsoleKind, ConsoleOption};

/// Exhaustion reason published when a session is opened with no options
pub const NO_OPTIONS_ERROR: &str = "no console options provided";

/// Driver lifecycle states.
///
/// `Exhausted` and `Closed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No attempt started yet
    Idle,
    /// An attempt for the cursor option is in flight
    Connecting,
    /// The cursor option produced a live session
    Connected,
    /// Every option failed
    Exhausted,
    /// The session was closed
    Closed,
}

impl DriverState {
    /// Returns whether this state is terminal
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted | Self::Closed)
    }
}

/// Effect the session task must perform after a driver transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverStep {
    /// Mount and connect the option at this index
    Attempt(usize),
    /// Publish the connected status for the winning option
    Connected(ConsoleKind),
    /// Tear down and publish exhaustion with the last failure reason
    Exhausted(String),
    /// Tear down and publish the closed status; `error` carries the
    /// failure that ended an established session abruptly, if any
    Closed {
        /// Cause of an abrupt post-connect drop
        error: Option<String>,
    },
    /// Nothing to do (event arrived in a state that ignores it)
    Ignore,
}

/// State machine advancing through console options
#[derive(Debug)]
pub struct FallbackDriver {
    options: Vec<ConsoleOption>,
    cursor: usize,
    state: DriverState,
    last_error: Option<String>,
}

impl FallbackDriver {
    /// Creates a driver over an ordered option list
    #[must_use]
    pub fn new(options: Vec<ConsoleOption>) -> Self {
        Self {
            options,
            cursor: 0,
            state: DriverState::Idle,
            last_error: None,
        }
    }

    /// Returns the current state
    #[must_use]
    pub const fn state(&self) -> DriverState {
        self.state
    }

    /// Returns the cursor into the option list.
    ///
    /// `cursor == options.len()` means the list is exhausted.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the number of options
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns whether the option list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Returns the option at `index`
    #[must_use]
    pub fn option(&self, index: usize) -> Option<&ConsoleOption> {
        self.options.get(index)
    }

    /// Returns the last failure reason observed
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Starts the session: the first attempt, or immediate exhaustion for
    /// an empty option list
    pub fn start(&mut self) -> DriverStep {
        if self.state != DriverState::Idle {
            return DriverStep::Ignore;
        }
        if self.options.is_empty() {
            self.state = DriverState::Exhausted;
            self.last_error = Some(NO_OPTIONS_ERROR.to_string());
            return DriverStep::Exhausted(NO_OPTIONS_ERROR.to_string());
        }
        self.state = DriverState::Connecting;
        DriverStep::Attempt(0)
    }

    /// Applies a normalized attempt outcome
    pub fn on_outcome(&mut self, outcome: AttemptOutcome) -> DriverStep {
        match (self.state, outcome) {
            (DriverState::Connecting, AttemptOutcome::Succeeded) => {
                let kind = self.options[self.cursor].kind();
                self.state = DriverState::Connected;
                tracing::info!(option = self.cursor, kind = %kind, "console connected");
                DriverStep::Connected(kind)
            }
            (DriverState::Connecting, AttemptOutcome::Failed(error)) => self.record_failure(&error),
            (DriverState::Connected, AttemptOutcome::Ended) => {
                self.state = DriverState::Closed;
                tracing::info!("console session ended cleanly");
                DriverStep::Closed { error: None }
            }
            (DriverState::Connected, AttemptOutcome::Failed(error)) => {
                // Connected permanently disables fallback; an abrupt drop
                // ends the session with the error recorded.
                let reason = error.to_string();
                self.last_error = Some(reason.clone());
                self.state = DriverState::Closed;
                tracing::warn!(%reason, "established console dropped");
                DriverStep::Closed {
                    error: Some(reason),
                }
            }
            (state, outcome) => {
                tracing::debug!(?state, ?outcome, "outcome ignored in current state");
                DriverStep::Ignore
            }
        }
    }

    /// Applies an explicit close.
    ///
    /// Safe in any state; terminal states ignore it.
    pub fn on_close(&mut self) -> DriverStep {
        if self.state.is_terminal() {
            return DriverStep::Ignore;
        }
        self.state = DriverState::Closed;
        DriverStep::Closed { error: None }
    }

    fn record_failure(&mut self, error: &ConsoleError) -> DriverStep {
        let reason = error.to_string();
        tracing::warn!(option = self.cursor, %reason, "console attempt failed");
        self.last_error = Some(reason.clone());

        if self.cursor + 1 < self.options.len() {
            self.cursor += 1;
            DriverStep::Attempt(self.cursor)
        } else {
            self.cursor = self.options.len();
            self.state = DriverState::Exhausted;
            DriverStep::Exhausted(reason)
        }
    }
}

//! Property tests for console option validation

use proptest::prelude::*;
use secrecy::SecretString;
use vmconsole_core::error::ConsoleError;
use vmconsole_core::models::ConnectionDetails;

use super::{console_option_strategy, vnc_details_strategy, webmks_details_strategy};

proptest! {
    /// Property: every generated option is structurally valid
    #[test]
    fn generated_options_validate(option in console_option_strategy()) {
        prop_assert!(option.validate().is_ok());
    }

    /// Property: blanking the VNC host always fails validation
    #[test]
    fn empty_vnc_host_is_rejected(
        details in vnc_details_strategy(),
        blank in "[ \t]{0,4}",
    ) {
        let mut details = details;
        details.host = blank;
        let option = vmconsole_core::models::ConsoleOption::new(ConnectionDetails::Vnc(details));
        prop_assert!(matches!(
            option.validate(),
            Err(ConsoleError::InvalidOptions(_))
        ));
    }

    /// Property: an empty ticket always fails validation
    #[test]
    fn empty_webmks_ticket_is_rejected(details in webmks_details_strategy()) {
        let mut details = details;
        details.ticket = SecretString::from("");
        let option =
            vmconsole_core::models::ConsoleOption::new(ConnectionDetails::Webmks(details));
        prop_assert!(option.validate().is_err());
    }

    /// Property: a zero port always fails validation
    #[test]
    fn zero_vnc_port_is_rejected(details in vnc_details_strategy()) {
        let mut details = details;
        details.vnc_port = 0;
        let option = vmconsole_core::models::ConsoleOption::new(ConnectionDetails::Vnc(details));
        prop_assert!(option.validate().is_err());
    }

    /// Property: labels fall back to the protocol kind and otherwise
    /// echo the display name
    #[test]
    fn label_prefers_display_name(
        option in console_option_strategy(),
        name in "[A-Za-z][A-Za-z0-9 ]{0,20}",
    ) {
        prop_assert_eq!(option.label(), option.kind().to_string());
        let named = option.with_display_name(name.clone());
        prop_assert_eq!(named.label(), name);
    }
}

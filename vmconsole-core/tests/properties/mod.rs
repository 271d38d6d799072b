mod driver_tests;
mod option_tests;
mod url_tests;

use proptest::prelude::*;
use secrecy::SecretString;
use vmconsole_core::models::{
    ConnectionDetails, ConsoleOption, Html5Details, MksDetails, VncDetails, WebmksDetails,
};

/// Strategy for plausible hostnames
pub fn hostname_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,20}(\\.[a-z][a-z0-9-]{0,10}){0,3}"
}

/// Strategy for ticket strings, including URL-hostile characters
pub fn ticket_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9+/=:_-]{8,64}"
}

/// Strategy for valid VNC details
pub fn vnc_details_strategy() -> impl Strategy<Value = VncDetails> {
    (
        hostname_strategy(),
        1u16..,
        "[a-z][a-z0-9]{0,12}",
        "[0-9]{1,6}",
        1u16..,
        ticket_strategy(),
        any::<bool>(),
    )
        .prop_map(|(host, port, node, vm_id, vnc_port, ticket, tls)| VncDetails {
            host,
            port,
            node,
            vm_id,
            vnc_port,
            ticket: SecretString::from(ticket),
            tls,
        })
}

/// Strategy for valid WebMKS details
pub fn webmks_details_strategy() -> impl Strategy<Value = WebmksDetails> {
    (
        hostname_strategy(),
        1u16..,
        ticket_strategy(),
        proptest::option::of("[A-F0-9:]{10,60}"),
    )
        .prop_map(|(host, port, ticket, ssl_thumbprint)| WebmksDetails {
            host,
            port,
            ticket: SecretString::from(ticket),
            ssl_thumbprint,
        })
}

/// Strategy for valid MKS details
pub fn mks_details_strategy() -> impl Strategy<Value = MksDetails> {
    (
        hostname_strategy(),
        ticket_strategy(),
        hostname_strategy(),
        1u16..,
        "\\[[a-z0-9]{1,10}\\] [a-z0-9/ .-]{1,30}\\.vmx",
        proptest::option::of("[A-F0-9:]{10,60}"),
    )
        .prop_map(
            |(vcenter_host, mks_ticket, esxi_host, esxi_port, cfg_file, ssl_thumbprint)| {
                MksDetails {
                    vcenter_host,
                    mks_ticket: SecretString::from(mks_ticket),
                    esxi_host,
                    esxi_port,
                    cfg_file,
                    ssl_thumbprint,
                }
            },
        )
}

/// Strategy for valid console options across all four kinds
pub fn console_option_strategy() -> impl Strategy<Value = ConsoleOption> {
    prop_oneof![
        vnc_details_strategy().prop_map(|d| ConsoleOption::new(ConnectionDetails::Vnc(d))),
        webmks_details_strategy().prop_map(|d| ConsoleOption::new(ConnectionDetails::Webmks(d))),
        mks_details_strategy().prop_map(|d| ConsoleOption::new(ConnectionDetails::Mks(d))),
        "[a-z0-9/-]{1,30}".prop_map(|path| {
            ConsoleOption::new(ConnectionDetails::Html5(Html5Details {
                url: format!("https://console.example.com/{path}"),
            }))
        }),
    ]
}

//! Property tests for connection URL builders

use proptest::prelude::*;
use secrecy::ExposeSecret;
use vmconsole_core::adapter::{
    build_mks_proxy_url, build_mks_proxy_url_redacted, build_vnc_proxy_url,
    build_vnc_proxy_url_redacted, build_webmks_url, build_webmks_url_redacted,
};

use super::{mks_details_strategy, vnc_details_strategy, webmks_details_strategy};

proptest! {
    /// Property: VNC proxy URLs carry the scheme, the proxy path, and
    /// the percent-encoded ticket; no raw whitespace survives
    #[test]
    fn vnc_url_shape(details in vnc_details_strategy()) {
        let url = build_vnc_proxy_url(&details);
        let scheme = if details.tls { "wss://" } else { "ws://" };

        prop_assert!(url.starts_with(scheme));
        prop_assert!(url.contains("/ws/proxmox-console/"));
        let vnc_port_param = format!("vncPort={}", details.vnc_port);
        prop_assert!(url.contains(&vnc_port_param));
        prop_assert!(!url.contains(' '));

        let encoded = urlencoding::encode(details.ticket.expose_secret()).into_owned();
        let ticket_param = format!("ticket={encoded}");
        prop_assert!(url.contains(&ticket_param));
    }

    /// Property: redacted VNC URLs never carry the ticket
    #[test]
    fn vnc_redacted_url_hides_ticket(details in vnc_details_strategy()) {
        let redacted = build_vnc_proxy_url_redacted(&details);
        let encoded = urlencoding::encode(details.ticket.expose_secret()).into_owned();
        let ticket_param = format!("ticket={encoded}");
        prop_assert!(!redacted.contains(&ticket_param));
        let vnc_port_param = format!("vncPort={}", details.vnc_port);
        prop_assert!(redacted.contains(&vnc_port_param));
    }

    /// Property: WebMKS URLs are always TLS and path-carry the encoded
    /// ticket
    #[test]
    fn webmks_url_shape(details in webmks_details_strategy()) {
        let url = build_webmks_url(&details);
        prop_assert!(url.starts_with("wss://"));
        prop_assert!(!url.contains(' '));

        let encoded = urlencoding::encode(details.ticket.expose_secret()).into_owned();
        let ticket_path = format!("/ticket/{encoded}");
        prop_assert!(url.ends_with(&ticket_path));

        let redacted = build_webmks_url_redacted(&details);
        prop_assert!(!redacted.ends_with(&ticket_path));
    }

    /// Property: MKS proxy URLs carry every routing parameter and encode
    /// the datastore path
    #[test]
    fn mks_url_shape(details in mks_details_strategy()) {
        let url = build_mks_proxy_url(&details);
        prop_assert!(url.starts_with("wss://"));
        prop_assert!(url.contains("/ws/mks-console?"));
        let port_param = format!("port={}", details.esxi_port);
        prop_assert!(url.contains(&port_param));
        prop_assert!(!url.contains(' '));

        let encoded_ticket =
            urlencoding::encode(details.mks_ticket.expose_secret()).into_owned();
        let mks_ticket_param = format!("mksTicket={encoded_ticket}");
        prop_assert!(url.contains(&mks_ticket_param));

        let encoded_cfg = urlencoding::encode(&details.cfg_file).into_owned();
        let cfg_param = format!("cfgFile={encoded_cfg}");
        prop_assert!(url.contains(&cfg_param));

        prop_assert_eq!(url.contains("sslThumbprint="), details.ssl_thumbprint.is_some());

        let redacted = build_mks_proxy_url_redacted(&details);
        prop_assert!(!redacted.contains(&mks_ticket_param));
    }
}

mod manager_scenarios;

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use vmconsole_core::models::{
    ConnectionDetails, ConsoleOption, Html5Details, VncDetails, WebmksDetails,
};
use vmconsole_core::session::{ConsoleSession, SessionStatus};

/// Builds a VNC option pointing at a console proxy
pub fn vnc_option(tag: &str) -> ConsoleOption {
    ConsoleOption::new(ConnectionDetails::Vnc(VncDetails {
        host: format!("proxy-{tag}.example.com"),
        port: 8443,
        node: "pve1".to_string(),
        vm_id: "101".to_string(),
        vnc_port: 5901,
        ticket: SecretString::from(format!("PVEVNC:{tag}==")),
        tls: true,
    }))
}

/// Builds a WebMKS option
pub fn webmks_option(tag: &str) -> ConsoleOption {
    ConsoleOption::new(ConnectionDetails::Webmks(WebmksDetails {
        host: format!("esxi-{tag}.example.com"),
        port: 443,
        ticket: SecretString::from(format!("wmks-{tag}")),
        ssl_thumbprint: None,
    }))
}

/// Builds an HTML5 option
pub fn html5_option(tag: &str) -> ConsoleOption {
    ConsoleOption::new(ConnectionDetails::Html5(Html5Details {
        url: format!("https://console.example.com/{tag}"),
    }))
}

/// Waits until the session status satisfies `pred`, panicking after five
/// seconds
pub async fn wait_for_status(
    session: &ConsoleSession,
    pred: impl Fn(&SessionStatus) -> bool,
) -> SessionStatus {
    let deadline = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let status = session.status();
            if pred(&status) {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    });
    deadline.await.expect("expected session status in time")
}

/// Waits until `cond` holds, panicking after five seconds
pub async fn wait_until(cond: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("expected condition in time");
}

/// Shorthand for an `Arc<dyn CapabilityProvider>` from static wiring
pub fn caps(
    provider: vmconsole_core::capability::StaticCapabilities,
) -> Arc<dyn vmconsole_core::capability::CapabilityProvider> {
    Arc::new(provider)
}

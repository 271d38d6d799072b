//! MKS-ticket-via-proxy adapter
//!
//! Older vSphere deployments issue MKS tickets that must be redeemed
//! through the vCenter console proxy rather than spoken directly to the
//! host. The proxy URL carries the ESXi endpoint, the VM configuration
//! file path, and the host thumbprint as query parameters; the native
//! client drives the protocol from there.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;

use super::{ConsoleAdapter, REDACTED_TICKET};
use crate::capability::{ClientHandle, ClientRequest, RemoteClient};
use crate::error::{ConsoleError, ConsoleResult};
use crate::guard::EventSink;
use crate::models::{ConsoleKind, MksDetails};
use crate::target::{ContainerSurface, MountTargets};

/// Builds the vCenter console-proxy URL for an MKS option
#[must_use]
pub fn build_mks_proxy_url(details: &MksDetails) -> String {
    mks_url_with_encoded_ticket(
        details,
        &urlencoding::encode(details.mks_ticket.expose_secret()),
    )
}

/// Builds the console-proxy URL with the ticket masked, for diagnostics
#[must_use]
pub fn build_mks_proxy_url_redacted(details: &MksDetails) -> String {
    mks_url_with_encoded_ticket(details, REDACTED_TICKET)
}

fn mks_url_with_encoded_ticket(details: &MksDetails, encoded_ticket: &str) -> String {
    let mut url = format!(
        "wss://{}/ws/mks-console?host={}&port={}&mksTicket={}&cfgFile={}",
        details.vcenter_host,
        urlencoding::encode(&details.esxi_host),
        details.esxi_port,
        encoded_ticket,
        urlencoding::encode(&details.cfg_file),
    );
    if let Some(thumbprint) = &details.ssl_thumbprint {
        url.push_str("&sslThumbprint=");
        url.push_str(&urlencoding::encode(thumbprint));
    }
    url
}

/// Adapter for MKS consoles redeemed through the vCenter proxy
pub struct MksAdapter {
    details: MksDetails,
    client: Arc<dyn RemoteClient>,
    connect_timeout: Duration,
    container: Option<Arc<dyn ContainerSurface>>,
    handle: Option<ClientHandle>,
}

impl MksAdapter {
    /// Creates the adapter from its connection details and native client
    #[must_use]
    pub fn new(
        details: MksDetails,
        client: Arc<dyn RemoteClient>,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            details,
            client,
            connect_timeout,
            container: None,
            handle: None,
        }
    }
}

impl ConsoleAdapter for MksAdapter {
    fn kind(&self) -> ConsoleKind {
        ConsoleKind::Mks
    }

    fn mount(&mut self, targets: &MountTargets) -> ConsoleResult<()> {
        if self.container.is_some() {
            tracing::debug!("mks adapter already mounted");
            return Ok(());
        }
        let container = targets.container.clone();
        container.bind();
        self.container = Some(container);
        Ok(())
    }

    fn connect(&mut self, events: EventSink) -> ConsoleResult<()> {
        if self.container.is_none() {
            return Err(ConsoleError::HandshakeFailed(
                "mks adapter is not mounted".to_string(),
            ));
        }

        let request = ClientRequest {
            kind: ConsoleKind::Mks,
            url: build_mks_proxy_url(&self.details),
            ssl_thumbprint: self.details.ssl_thumbprint.clone(),
            connect_timeout: self.connect_timeout,
        };

        tracing::info!(
            vcenter = %self.details.vcenter_host,
            esxi = %self.details.esxi_host,
            "starting mks console attempt"
        );

        let client = Arc::clone(&self.client);
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel();
        let task = tokio::spawn(async move {
            client.run(request, events, stop_rx).await;
        });
        self.handle = Some(ClientHandle::new(stop_tx, task));
        Ok(())
    }

    fn teardown(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.shutdown();
        }
        if let Some(container) = self.container.take() {
            container.release();
        }
    }
}

impl Drop for MksAdapter {
    fn drop(&mut self) {
        self.teardown();
    }
}

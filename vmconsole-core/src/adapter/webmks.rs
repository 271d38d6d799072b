//! WebMKS ticket adapter
//!
//! Builds the ticket-bearing `wss://` URL the WebMKS client expects and
//! delegates the protocol itself to the injected native client. TLS
//! thumbprint validation belongs to that client, not to this crate.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;

use super::{ConsoleAdapter, REDACTED_TICKET};
use crate::capability::{ClientHandle, ClientRequest, RemoteClient};
use crate::error::{ConsoleError, ConsoleResult};
use crate::guard::EventSink;
use crate::models::{ConsoleKind, WebmksDetails};
use crate::target::{ContainerSurface, MountTargets};

/// Builds the WebMKS ticket URL for an option
#[must_use]
pub fn build_webmks_url(details: &WebmksDetails) -> String {
    webmks_url_with_encoded_ticket(details, &urlencoding::encode(details.ticket.expose_secret()))
}

/// Builds the WebMKS URL with the ticket masked, for diagnostics
#[must_use]
pub fn build_webmks_url_redacted(details: &WebmksDetails) -> String {
    webmks_url_with_encoded_ticket(details, REDACTED_TICKET)
}

fn webmks_url_with_encoded_ticket(details: &WebmksDetails, encoded_ticket: &str) -> String {
    format!(
        "wss://{}:{}/ticket/{}",
        details.host, details.port, encoded_ticket
    )
}

/// Adapter for WebMKS consoles served directly by the host
pub struct WebmksAdapter {
    details: WebmksDetails,
    client: Arc<dyn RemoteClient>,
    connect_timeout: Duration,
    container: Option<Arc<dyn ContainerSurface>>,
    handle: Option<ClientHandle>,
}

impl WebmksAdapter {
    /// Creates the adapter from its connection details and native client
    #[must_use]
    pub fn new(
        details: WebmksDetails,
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

impl ConsoleAdapter for WebmksAdapter {
    fn kind(&self) -> ConsoleKind {
        ConsoleKind::Webmks
    }

    fn mount(&mut self, targets: &MountTargets) -> ConsoleResult<()> {
        if self.container.is_some() {
            tracing::debug!("webmks adapter already mounted");
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
                "webmks adapter is not mounted".to_string(),
            ));
        }

        let request = ClientRequest {
            kind: ConsoleKind::Webmks,
            url: build_webmks_url(&self.details),
            ssl_thumbprint: self.details.ssl_thumbprint.clone(),
            connect_timeout: self.connect_timeout,
        };

        tracing::info!(host = %self.details.host, port = self.details.port,
            "starting webmks console attempt");

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

impl Drop for WebmksAdapter {
    fn drop(&mut self) {
        self.teardown();
    }
}

//! Injected native client capabilities
//!
//! The VNC and WebMKS/MKS native clients are externally-supplied
//! capabilities rather than in-tree protocol engines. The orchestrator
//! queries the provider at attempt time; a missing capability maps to
//! [`ConsoleError::CapabilityUnavailable`](crate::error::ConsoleError) and
//! triggers fallback instead of crashing the session.
//!
//! A production WebSocket transport for the VNC console proxy is included;
//! the WebMKS/MKS client is always injected by the embedding application.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::adapter::AdapterEvent;
use crate::guard::EventSink;
use crate::models::ConsoleKind;

/// Connection request handed to a native client
#[derive(Clone)]
pub struct ClientRequest {
    /// Protocol kind of the attempt
    pub kind: ConsoleKind,
    /// Fully-formed, ticket-bearing connection URL
    pub url: String,
    /// Host TLS thumbprint for the native client to validate
    pub ssl_thumbprint: Option<String>,
    /// How long the dial may take before it counts as a handshake failure
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for ClientRequest {
    // The URL embeds a ticket; never let it reach logs through Debug.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRequest")
            .field("kind", &self.kind)
            .field("url", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

/// A native remote-display client.
///
/// `run` dials the console endpoint and drives the connection until it
/// ends or `stop` resolves. Lifecycle events flow through `events`; the
/// implementation must emit `Connected` once the link is established and
/// exactly one terminal event when it ends. It must never panic.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Dials and drives one connection
    async fn run(&self, request: ClientRequest, events: EventSink, stop: oneshot::Receiver<()>);
}

/// Handle to a running native client connection.
///
/// Shutdown is fire-and-forget: it signals the client task to stop and
/// detaches. Dropping the handle shuts the connection down.
pub struct ClientHandle {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ClientHandle {
    pub(crate) fn new(stop: oneshot::Sender<()>, task: JoinHandle<()>) -> Self {
        Self {
            stop: Some(stop),
            task: Some(task),
        }
    }

    /// Signals the client task to stop without waiting for it
    pub fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        // Detach; the task exits once it observes the stop signal.
        self.task.take();
    }
}

impl Drop for ClientHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Supplier of native client capabilities, queried at attempt time
pub trait CapabilityProvider: Send + Sync {
    /// Transport for VNC-over-WebSocket consoles
    fn vnc_transport(&self) -> Option<Arc<dyn RemoteClient>>;

    /// Native client for WebMKS and MKS consoles
    fn mks_client(&self) -> Option<Arc<dyn RemoteClient>>;
}

/// Fixed capability wiring assembled at startup
#[derive(Default)]
pub struct StaticCapabilities {
    vnc: Option<Arc<dyn RemoteClient>>,
    mks: Option<Arc<dyn RemoteClient>>,
}

impl StaticCapabilities {
    /// Creates an empty provider (every capability absent)
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets the VNC WebSocket transport
    #[must_use]
    pub fn with_vnc_transport(mut self, transport: Arc<dyn RemoteClient>) -> Self {
        self.vnc = Some(transport);
        self
    }

    /// Sets the WebMKS/MKS native client
    #[must_use]
    pub fn with_mks_client(mut self, client: Arc<dyn RemoteClient>) -> Self {
        self.mks = Some(client);
        self
    }
}

impl CapabilityProvider for StaticCapabilities {
    fn vnc_transport(&self) -> Option<Arc<dyn RemoteClient>> {
        self.vnc.clone()
    }

    fn mks_client(&self) -> Option<Arc<dyn RemoteClient>> {
        self.mks.clone()
    }
}

/// Which capabilities a provider currently supplies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityReport {
    /// VNC WebSocket transport present
    pub vnc_transport: bool,
    /// WebMKS/MKS native client present
    pub mks_client: bool,
}

/// Reports which capabilities `provider` supplies
#[must_use]
pub fn availability_report(provider: &dyn CapabilityProvider) -> CapabilityReport {
    CapabilityReport {
        vnc_transport: provider.vnc_transport().is_some(),
        mks_client: provider.mks_client().is_some(),
    }
}

/// Production VNC transport: dials the console proxy over WebSocket and
/// reports link lifecycle as adapter events.
///
/// Display frames themselves are consumed by the bound surface in the UI
/// layer; the orchestrator only tracks connection liveness.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    /// Creates the transport
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RemoteClient for WebSocketTransport {
    async fn run(&self, request: ClientRequest, events: EventSink, stop: oneshot::Receiver<()>) {
        let mut stop = stop;

        let dial = tokio::time::timeout(
            request.connect_timeout,
            tokio_tungstenite::connect_async(request.url.clone()),
        );

        let ws = tokio::select! {
            _ = &mut stop => return,
            dialed = dial => match dialed {
                Err(_) => {
                    events.emit(AdapterEvent::ProtocolError(format!(
                        "connect timed out after {}s",
                        request.connect_timeout.as_secs()
                    )));
                    return;
                }
                Ok(Err(e)) => {
                    events.emit(dial_failure_event(&e));
                    return;
                }
                Ok(Ok((ws, _response))) => ws,
            },
        };

        tracing::debug!(kind = %request.kind, "console websocket established");
        events.emit(AdapterEvent::Connected);

        let (mut write, mut read) = ws.split();
        loop {
            tokio::select! {
                _ = &mut stop => {
                    let _ = write.send(Message::Close(None)).await;
                    return;
                }
                frame = read.next() => match frame {
                    Some(Ok(Message::Close(close))) => {
                        let reason = close
                            .map(|f| f.reason.to_string())
                            .filter(|r| !r.is_empty())
                            .unwrap_or_else(|| "server closed the console".to_string());
                        events.emit(AdapterEvent::Disconnected {
                            reason,
                            clean: true,
                        });
                        return;
                    }
                    // Display traffic; consumed by the bound surface.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        events.emit(AdapterEvent::Disconnected {
                            reason: e.to_string(),
                            clean: false,
                        });
                        return;
                    }
                    None => {
                        events.emit(AdapterEvent::Disconnected {
                            reason: "console stream ended".to_string(),
                            clean: false,
                        });
                        return;
                    }
                }
            }
        }
    }
}

/// Maps a WebSocket dial error to the adapter event taxonomy.
///
/// An HTTP 401/403 from the proxy means the ticket was rejected; every
/// other dial error is a handshake-phase protocol error.
fn dial_failure_event(error: &WsError) -> AdapterEvent {
    match error {
        WsError::Http(response)
            if response.status().as_u16() == 401 || response.status().as_u16() == 403 =>
        {
            AdapterEvent::SecurityFailure(format!(
                "console proxy rejected the ticket (HTTP {})",
                response.status().as_u16()
            ))
        }
        other => AdapterEvent::ProtocolError(format!("websocket connect failed: {other}")),
    }
}

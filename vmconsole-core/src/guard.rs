//! Generation-tagged resource guard
//!
//! The guard owns the single live adapter and a monotonically increasing
//! generation token. Every event an adapter emits is stamped with the
//! generation it was mounted under; the guard drops events whose stamp no
//! longer matches the current generation. A slow-to-arrive event from an
//! abandoned attempt (a VNC disconnect firing after the driver already
//! moved on to WebMKS) is silently discarded instead of corrupting the new
//! attempt's state or double-triggering fallback.
//!
//! Replacement order is fixed: teardown of the previous adapter is
//! initiated before the next adapter is constructed. Teardown itself is
//! fire-and-forget; its failures are logged, never propagated.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::adapter::{self, AdapterEvent, ConsoleAdapter};
use crate::capability::CapabilityProvider;
use crate::config::OrchestratorConfig;
use crate::error::{ConsoleError, ConsoleResult};
use crate::models::{ConsoleKind, ConsoleOption};
use crate::target::MountTargets;

/// An adapter event stamped with the generation it belongs to
#[derive(Debug, Clone)]
pub struct TaggedEvent {
    /// Generation the emitting adapter was mounted under
    pub generation: u64,
    /// The adapter event
    pub event: AdapterEvent,
}

/// Generation-stamping event sender handed to adapters.
///
/// Cloning is cheap; every clone keeps the generation it was minted with,
/// so events from a superseded attempt stay identifiable no matter how
/// late they fire.
#[derive(Debug, Clone)]
pub struct EventSink {
    generation: u64,
    tx: mpsc::UnboundedSender<TaggedEvent>,
}

impl EventSink {
    pub(crate) const fn new(generation: u64, tx: mpsc::UnboundedSender<TaggedEvent>) -> Self {
        Self { generation, tx }
    }

    /// Returns the generation this sink stamps events with
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Emits an adapter event.
    ///
    /// Send failures mean the session is gone; the event is dropped.
    pub fn emit(&self, event: AdapterEvent) {
        let _ = self.tx.send(TaggedEvent {
            generation: self.generation,
            event,
        });
    }
}

/// Normalized result of one console attempt, consumed by the fallback
/// driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The attempt produced a live console session
    Succeeded,
    /// The attempt failed; fallback advances to the next option
    Failed(ConsoleError),
    /// An established session ended cleanly
    Ended,
}

/// Owner of the single live adapter and the generation counter
pub struct ResourceGuard {
    generation: u64,
    current: Option<Box<dyn ConsoleAdapter>>,
    current_kind: Option<ConsoleKind>,
    connected: bool,
    settled: bool,
    tx: mpsc::UnboundedSender<TaggedEvent>,
}

impl ResourceGuard {
    /// Creates a guard emitting tagged events into `tx`
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<TaggedEvent>) -> Self {
        Self {
            generation: 0,
            current: None,
            current_kind: None,
            connected: false,
            settled: false,
            tx,
        }
    }

    /// Returns the current generation
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns whether `generation` is the live one
    #[must_use]
    pub const fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Returns whether an adapter is currently live
    #[must_use]
    pub const fn has_live_adapter(&self) -> bool {
        self.current.is_some()
    }

    /// Tears down the previous adapter and mounts a new one for `option`.
    ///
    /// Mints a new generation first, so any event the outgoing adapter
    /// still emits is already stale. Teardown of the previous adapter is
    /// initiated before the new adapter is constructed; at the swap
    /// instant at most two native resources exist, and only until the
    /// outgoing teardown completes.
    ///
    /// # Errors
    ///
    /// Returns the attempt-failure error when the required capability is
    /// missing or mount/connect fail. The guard holds no adapter after a
    /// failed replace.
    pub fn replace(
        &mut self,
        option: &ConsoleOption,
        targets: &MountTargets,
        capabilities: &Arc<dyn CapabilityProvider>,
        config: &OrchestratorConfig,
    ) -> ConsoleResult<u64> {
        self.generation += 1;
        self.connected = false;
        self.settled = false;
        self.current_kind = Some(option.kind());

        if let Some(mut previous) = self.current.take() {
            tracing::debug!(
                generation = self.generation,
                kind = %previous.kind(),
                "tearing down superseded adapter"
            );
            previous.teardown();
        }

        let sink = EventSink::new(self.generation, self.tx.clone());
        let mut next = adapter::build(option, capabilities, config)?;
        if let Err(e) = next.mount(targets).and_then(|()| next.connect(sink)) {
            next.teardown();
            self.settled = true;
            return Err(e);
        }

        self.current = Some(next);
        Ok(self.generation)
    }

    /// Tears down the current adapter and advances the generation one
    /// final time so no further events are honored
    pub fn teardown_all(&mut self) {
        if let Some(mut current) = self.current.take() {
            tracing::debug!(kind = %current.kind(), "tearing down live adapter");
            current.teardown();
        }
        self.generation += 1;
        self.current_kind = None;
        self.connected = false;
        self.settled = true;
    }

    /// Folds a tagged adapter event into an attempt outcome.
    ///
    /// Returns `None` for events that must not reach the driver: stale
    /// generations, duplicate `Connected`s, and anything after the
    /// current attempt already settled.
    pub fn normalize(&mut self, tagged: &TaggedEvent) -> Option<AttemptOutcome> {
        if tagged.generation != self.generation {
            tracing::debug!(
                stale = tagged.generation,
                current = self.generation,
                "discarding event from superseded attempt"
            );
            return None;
        }
        if self.settled {
            tracing::debug!(generation = self.generation, "attempt already settled");
            return None;
        }

        let kind = self.current_kind?;
        match &tagged.event {
            AdapterEvent::Connected => {
                if self.connected {
                    return None;
                }
                self.connected = true;
                Some(AttemptOutcome::Succeeded)
            }
            AdapterEvent::SecurityFailure(reason) => {
                self.settled = true;
                Some(AttemptOutcome::Failed(ConsoleError::SecurityFailure(
                    reason.clone(),
                )))
            }
            AdapterEvent::ProtocolError(reason) => {
                self.settled = true;
                if self.connected {
                    Some(AttemptOutcome::Failed(ConsoleError::AbruptDisconnect(
                        reason.clone(),
                    )))
                } else if kind == ConsoleKind::Html5 {
                    Some(AttemptOutcome::Failed(ConsoleError::LoadFailure(
                        reason.clone(),
                    )))
                } else {
                    Some(AttemptOutcome::Failed(ConsoleError::HandshakeFailed(
                        reason.clone(),
                    )))
                }
            }
            AdapterEvent::Disconnected { reason, clean } => {
                self.settled = true;
                if self.connected && *clean {
                    Some(AttemptOutcome::Ended)
                } else {
                    // Before a connect, the clean flag is meaningless: the
                    // attempt never produced a session.
                    Some(AttemptOutcome::Failed(ConsoleError::AbruptDisconnect(
                        reason.clone(),
                    )))
                }
            }
        }
    }
}

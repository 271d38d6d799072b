//! Deterministic test doubles for session scenarios
//!
//! A scripted native client plays back a planned sequence of connection
//! outcomes, and recording mount surfaces count binds and releases so
//! tests can assert the single-liveness invariant. The scripted client
//! also hands out the generation-stamped sinks it received, which lets a
//! test fire a late event from a superseded attempt on purpose.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::adapter::AdapterEvent;
use crate::capability::{ClientRequest, RemoteClient};
use crate::guard::EventSink;
use crate::target::{CanvasSurface, ContainerSurface, FrameObserver, FrameSurface, MountTargets};

/// One planned connection outcome for a [`ScriptedClient`]
#[derive(Debug, Clone)]
pub enum ScriptedBehavior {
    /// Connect and stay up until torn down
    Connect,
    /// Connect, then disconnect after a short delay
    ConnectThenDisconnect {
        /// Delay before the disconnect, in milliseconds
        delay_ms: u64,
        /// Disconnect reason
        reason: String,
        /// Whether the disconnect is clean
        clean: bool,
    },
    /// Fail the handshake with a protocol error
    FailProtocol(String),
    /// Fail the handshake with a security failure
    FailSecurity(String),
    /// Drop the link before connecting
    FailDisconnect {
        /// Disconnect reason
        reason: String,
        /// Clean flag carried by the disconnect
        clean: bool,
    },
    /// Emit nothing until torn down
    Silent,
}

/// Scripted native client playing back planned outcomes in order.
///
/// Runs past the end of the plan behave as [`ScriptedBehavior::Silent`].
pub struct ScriptedClient {
    plan: Mutex<VecDeque<ScriptedBehavior>>,
    sinks: Mutex<Vec<EventSink>>,
    runs: AtomicU64,
}

impl ScriptedClient {
    /// Creates a client over a plan of outcomes, one per run
    #[must_use]
    pub fn new(plan: Vec<ScriptedBehavior>) -> Arc<Self> {
        Arc::new(Self {
            plan: Mutex::new(plan.into()),
            sinks: Mutex::new(Vec::new()),
            runs: AtomicU64::new(0),
        })
    }

    /// Returns how many runs were started
    #[must_use]
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::SeqCst)
    }

    /// Returns how many planned outcomes were not consumed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.plan.lock().map(|plan| plan.len()).unwrap_or(0)
    }

    /// Returns the event sink handed to run `index`.
    ///
    /// Sinks keep the generation they were minted with, so this is the
    /// lever for emitting deliberately stale events in tests.
    #[must_use]
    pub fn sink(&self, index: usize) -> Option<EventSink> {
        self.sinks
            .lock()
            .ok()
            .and_then(|sinks| sinks.get(index).cloned())
    }

    fn next_behavior(&self) -> ScriptedBehavior {
        self.plan
            .lock()
            .ok()
            .and_then(|mut plan| plan.pop_front())
            .unwrap_or(ScriptedBehavior::Silent)
    }
}

#[async_trait]
impl RemoteClient for ScriptedClient {
    async fn run(&self, _request: ClientRequest, events: EventSink, stop: oneshot::Receiver<()>) {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut sinks) = self.sinks.lock() {
            sinks.push(events.clone());
        }

        let mut stop = stop;
        match self.next_behavior() {
            ScriptedBehavior::Connect => {
                events.emit(AdapterEvent::Connected);
                let _ = (&mut stop).await;
            }
            ScriptedBehavior::ConnectThenDisconnect {
                delay_ms,
                reason,
                clean,
            } => {
                events.emit(AdapterEvent::Connected);
                tokio::select! {
                    () = tokio::time::sleep(Duration::from_millis(delay_ms)) => {
                        events.emit(AdapterEvent::Disconnected { reason, clean });
                    }
                    _ = &mut stop => {}
                }
            }
            ScriptedBehavior::FailProtocol(reason) => {
                events.emit(AdapterEvent::ProtocolError(reason));
            }
            ScriptedBehavior::FailSecurity(reason) => {
                events.emit(AdapterEvent::SecurityFailure(reason));
            }
            ScriptedBehavior::FailDisconnect { reason, clean } => {
                events.emit(AdapterEvent::Disconnected { reason, clean });
            }
            ScriptedBehavior::Silent => {
                let _ = (&mut stop).await;
            }
        }
    }
}

/// Planned load outcome for a recording frame surface
#[derive(Debug, Clone)]
pub enum FrameScript {
    /// Report the navigation as loaded
    Loaded,
    /// Report the navigation as failed
    Failed(String),
    /// Report nothing (a hanging load)
    Pending,
}

/// Shared counters tracking surface lifecycle across one scenario
#[derive(Debug, Default)]
pub struct LivenessProbe {
    live: AtomicI64,
    max_live: AtomicI64,
    binds: AtomicU64,
    releases: AtomicU64,
    resets: AtomicU64,
    navigations: Mutex<Vec<String>>,
}

impl LivenessProbe {
    /// Creates a probe
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Surfaces currently bound
    #[must_use]
    pub fn live(&self) -> i64 {
        self.live.load(Ordering::SeqCst)
    }

    /// Most surfaces ever bound at the same instant
    #[must_use]
    pub fn max_live(&self) -> i64 {
        self.max_live.load(Ordering::SeqCst)
    }

    /// Total binds observed
    #[must_use]
    pub fn binds(&self) -> u64 {
        self.binds.load(Ordering::SeqCst)
    }

    /// Total releases observed
    #[must_use]
    pub fn releases(&self) -> u64 {
        self.releases.load(Ordering::SeqCst)
    }

    /// Total frame resets observed
    #[must_use]
    pub fn resets(&self) -> u64 {
        self.resets.load(Ordering::SeqCst)
    }

    /// URLs navigated to, in order
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.navigations
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }

    fn on_bind(&self) {
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_live.fetch_max(live, Ordering::SeqCst);
        self.binds.fetch_add(1, Ordering::SeqCst);
    }

    fn on_release(&self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Mount targets whose surfaces report into a probe; the frame loads
/// every navigation successfully
#[must_use]
pub fn recording_targets(probe: &Arc<LivenessProbe>) -> MountTargets {
    recording_targets_with_frame(probe, Vec::new())
}

/// Mount targets whose surfaces report into a probe, with scripted frame
/// load outcomes.
///
/// Navigations past the end of the script behave as
/// [`FrameScript::Loaded`].
#[must_use]
pub fn recording_targets_with_frame(
    probe: &Arc<LivenessProbe>,
    frame_script: Vec<FrameScript>,
) -> MountTargets {
    let surface = Arc::new(ProbeSurface {
        probe: probe.clone(),
    });
    let frame = Arc::new(ProbeFrame {
        probe: probe.clone(),
        script: Mutex::new(frame_script.into()),
    });
    MountTargets::new(surface.clone(), surface, frame)
}

struct ProbeSurface {
    probe: Arc<LivenessProbe>,
}

impl CanvasSurface for ProbeSurface {
    fn bind(&self) {
        self.probe.on_bind();
    }
    fn release(&self) {
        self.probe.on_release();
    }
}

impl ContainerSurface for ProbeSurface {
    fn bind(&self) {
        self.probe.on_bind();
    }
    fn release(&self) {
        self.probe.on_release();
    }
}

struct ProbeFrame {
    probe: Arc<LivenessProbe>,
    script: Mutex<VecDeque<FrameScript>>,
}

impl FrameSurface for ProbeFrame {
    fn bind(&self) {
        self.probe.on_bind();
    }

    fn navigate(&self, url: &str, observer: FrameObserver) {
        if let Ok(mut urls) = self.probe.navigations.lock() {
            urls.push(url.to_string());
        }
        let step = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or(FrameScript::Loaded);
        match step {
            FrameScript::Loaded => observer.loaded(),
            FrameScript::Failed(reason) => observer.failed(reason),
            FrameScript::Pending => {}
        }
    }

    fn reset(&self, _neutral_url: &str) {
        self.probe.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.probe.on_release();
    }
}

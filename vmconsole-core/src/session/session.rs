//! The session façade and its background task.
//!
//! `ConsoleSession::open` validates the option list, spawns the session
//! task, and returns a handle. The task owns the fallback driver and the
//! resource guard and is the only place session state is mutated; the
//! handle communicates with it over channels, so `close()` is safe from
//! any thread and idempotent. Dropping the handle closes the session.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::Instrument;
use uuid::Uuid;

use super::SessionStatus;
use crate::capability::CapabilityProvider;
use crate::config::OrchestratorConfig;
use crate::driver::{DriverStep, FallbackDriver};
use crate::error::ConsoleResult;
use crate::guard::{AttemptOutcome, ResourceGuard, TaggedEvent};
use crate::models::ConsoleOption;
use crate::target::MountTargets;

/// Commands the handle sends to the session task
#[derive(Debug)]
enum SessionCommand {
    Close,
}

/// Handle to one live console session
pub struct ConsoleSession {
    id: Uuid,
    vm_name: String,
    opened_at: DateTime<Utc>,
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    status_rx: watch::Receiver<SessionStatus>,
    updates_rx: Option<mpsc::UnboundedReceiver<SessionStatus>>,
    last_error: Arc<Mutex<Option<String>>>,
}

impl ConsoleSession {
    /// Opens a session over `options`, in priority order.
    ///
    /// Must be called within a tokio runtime. An empty option list is
    /// accepted and exhausts immediately; a structurally invalid option
    /// is the only synchronous failure.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InvalidOptions`](crate::error::ConsoleError)
    /// when an option fails validation.
    pub fn open(
        vm_name: impl Into<String>,
        options: Vec<ConsoleOption>,
        targets: MountTargets,
        capabilities: Arc<dyn CapabilityProvider>,
        config: OrchestratorConfig,
    ) -> ConsoleResult<Self> {
        for option in &options {
            option.validate()?;
        }

        let vm_name = vm_name.into();
        let id = Uuid::new_v4();

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (watch_tx, status_rx) = watch::channel(SessionStatus::Idle);
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let last_error = Arc::new(Mutex::new(None));

        let task = SessionTask {
            driver: FallbackDriver::new(options),
            guard: ResourceGuard::new(event_tx),
            targets,
            capabilities,
            config,
            command_rx,
            event_rx,
            watch_tx,
            updates_tx,
            last_error: last_error.clone(),
        };

        tracing::info!(session = %id, vm = %vm_name, "opening console session");
        let span = tracing::info_span!("console.session", session = %id, vm = %vm_name);
        tokio::spawn(task.run().instrument(span));

        Ok(Self {
            id,
            vm_name,
            opened_at: Utc::now(),
            command_tx,
            status_rx,
            updates_rx: Some(updates_rx),
            last_error,
        })
    }

    /// Returns the session id
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the VM name this session belongs to
    #[must_use]
    pub fn vm_name(&self) -> &str {
        &self.vm_name
    }

    /// Returns when the session was opened
    #[must_use]
    pub const fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Returns the current status snapshot
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status_rx.borrow().clone()
    }

    /// Returns whether the session reached a terminal status
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    /// Returns the last failure reason observed, for exhaustion and
    /// dropped-session diagnostics
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().map(|g| g.clone()).unwrap_or(None)
    }

    /// Takes the ordered status update stream.
    ///
    /// Every transition is delivered exactly once, in order. Returns
    /// `None` after the first call.
    pub fn take_updates(&mut self) -> Option<mpsc::UnboundedReceiver<SessionStatus>> {
        self.updates_rx.take()
    }

    /// Tries to receive the next status update without blocking
    pub fn try_recv_update(&mut self) -> Option<SessionStatus> {
        self.updates_rx.as_mut()?.try_recv().ok()
    }

    /// Closes the session.
    ///
    /// Idempotent and safe in any state: the close is delivered to the
    /// session task, which tears the live adapter down and advances the
    /// generation so in-flight native callbacks become no-ops. Calls
    /// after termination do nothing.
    pub fn close(&self) {
        let _ = self.command_tx.send(SessionCommand::Close);
    }

    /// Waits until the session reaches a terminal status and returns it
    pub async fn wait_terminal(&mut self) -> SessionStatus {
        loop {
            let status = self.status_rx.borrow_and_update().clone();
            if status.is_terminal() {
                return status;
            }
            if self.status_rx.changed().await.is_err() {
                return self.status_rx.borrow().clone();
            }
        }
    }
}

impl Drop for ConsoleSession {
    fn drop(&mut self) {
        // View teardown closes the session; the task also treats a closed
        // command channel as a close.
        let _ = self.command_tx.send(SessionCommand::Close);
    }
}

/// Background task owning the driver and the resource guard
struct SessionTask {
    driver: FallbackDriver,
    guard: ResourceGuard,
    targets: MountTargets,
    capabilities: Arc<dyn CapabilityProvider>,
    config: OrchestratorConfig,
    command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    event_rx: mpsc::UnboundedReceiver<TaggedEvent>,
    watch_tx: watch::Sender<SessionStatus>,
    updates_tx: mpsc::UnboundedSender<SessionStatus>,
    last_error: Arc<Mutex<Option<String>>>,
}

/// What woke the session task up
enum Wake {
    /// A close command arrived (or every handle is gone)
    Close,
    /// A tagged adapter event arrived
    Event(TaggedEvent),
    /// The event channel closed
    Gone,
}

impl SessionTask {
    async fn run(mut self) {
        let step = self.driver.start();
        if !self.apply(step).await {
            return;
        }

        loop {
            let wake = tokio::select! {
                command = self.command_rx.recv() => {
                    // None means every handle is gone; same as Close.
                    let _ = command;
                    Wake::Close
                }
                event = self.event_rx.recv() => {
                    event.map_or(Wake::Gone, Wake::Event)
                }
            };

            let step = match wake {
                Wake::Close => self.driver.on_close(),
                Wake::Gone => return,
                Wake::Event(tagged) => {
                    let Some(outcome) = self.guard.normalize(&tagged) else {
                        continue;
                    };
                    self.driver.on_outcome(outcome)
                }
            };

            if !self.apply(step).await {
                return;
            }
        }
    }

    /// Executes driver steps until the session is waiting on events
    /// again. Returns `false` once the session is terminal.
    async fn apply(&mut self, step: DriverStep) -> bool {
        let mut step = step;
        loop {
            match step {
                DriverStep::Attempt(index) => {
                    let Some(option) = self.driver.option(index).cloned() else {
                        return false;
                    };

                    if index > 0
                        && !self.config.fallback_delay().is_zero()
                        && self.delay_before_fallback().await
                    {
                        step = self.driver.on_close();
                        continue;
                    }

                    self.publish(SessionStatus::Connecting(option.kind()));
                    match self.guard.replace(
                        &option,
                        &self.targets,
                        &self.capabilities,
                        &self.config,
                    ) {
                        Ok(generation) => {
                            tracing::debug!(
                                generation,
                                option = index,
                                kind = %option.kind(),
                                "console attempt mounted"
                            );
                            return true;
                        }
                        Err(error) => {
                            step = self.driver.on_outcome(AttemptOutcome::Failed(error));
                        }
                    }
                }
                DriverStep::Connected(kind) => {
                    self.publish(SessionStatus::Connected(kind));
                    return true;
                }
                DriverStep::Exhausted(reason) => {
                    self.guard.teardown_all();
                    self.set_last_error(reason.clone());
                    self.publish(SessionStatus::Exhausted(reason));
                    return false;
                }
                DriverStep::Closed { error } => {
                    self.guard.teardown_all();
                    if let Some(reason) = error {
                        self.set_last_error(reason);
                    }
                    self.publish(SessionStatus::Closed);
                    return false;
                }
                DriverStep::Ignore => return true,
            }
        }
    }

    /// Sleeps the configured fallback delay; returns `true` when a close
    /// arrived during the wait instead
    async fn delay_before_fallback(&mut self) -> bool {
        tokio::select! {
            () = tokio::time::sleep(self.config.fallback_delay()) => false,
            command = self.command_rx.recv() => {
                let _ = command;
                true
            }
        }
    }

    fn publish(&self, status: SessionStatus) {
        tracing::debug!(status = %status, "session status transition");
        // Enqueue on the ordered update stream before signalling the watch
        // channel. A task waiting on `wait_terminal` wakes off the watch
        // value, so the update must already be queued by then or the final
        // (terminal) transition can be missed by a racing drainer.
        let _ = self.updates_tx.send(status.clone());
        self.watch_tx.send_replace(status);
    }

    fn set_last_error(&self, reason: String) {
        if let Ok(mut guard) = self.last_error.lock() {
            *guard = Some(reason);
        }
    }
}

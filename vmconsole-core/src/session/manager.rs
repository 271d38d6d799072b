//! Session manager
//!
//! Tracks one live console session per VM. Opening a console for a VM
//! that already has one closes the previous session first, preserving the
//! single-liveness invariant across reopens.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use super::ConsoleSession;
use crate::capability::CapabilityProvider;
use crate::config::OrchestratorConfig;
use crate::error::ConsoleResult;
use crate::models::ConsoleOption;
use crate::target::MountTargets;

/// Manages console sessions keyed by VM id
#[derive(Default)]
pub struct SessionManager {
    sessions: HashMap<Uuid, ConsoleSession>,
}

impl SessionManager {
    /// Creates an empty manager
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a console session for a VM, closing any previous session for
    /// the same VM first.
    ///
    /// Returns the new session id.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InvalidOptions`](crate::error::ConsoleError)
    /// when an option fails validation; the previous session (if any) has
    /// already been closed in that case.
    pub fn open_for_vm(
        &mut self,
        vm_id: Uuid,
        vm_name: impl Into<String>,
        options: Vec<ConsoleOption>,
        targets: MountTargets,
        capabilities: Arc<dyn CapabilityProvider>,
        config: OrchestratorConfig,
    ) -> ConsoleResult<Uuid> {
        if let Some(previous) = self.sessions.remove(&vm_id) {
            tracing::info!(vm = %vm_id, session = %previous.id(),
                "closing previous console session for vm");
            previous.close();
        }

        let session = ConsoleSession::open(vm_name, options, targets, capabilities, config)?;
        let session_id = session.id();
        self.sessions.insert(vm_id, session);
        Ok(session_id)
    }

    /// Returns the session for a VM
    #[must_use]
    pub fn session(&self, vm_id: Uuid) -> Option<&ConsoleSession> {
        self.sessions.get(&vm_id)
    }

    /// Returns a mutable reference to the session for a VM
    pub fn session_mut(&mut self, vm_id: Uuid) -> Option<&mut ConsoleSession> {
        self.sessions.get_mut(&vm_id)
    }

    /// Closes and removes the session for a VM.
    ///
    /// Returns whether a session existed.
    pub fn close_vm(&mut self, vm_id: Uuid) -> bool {
        if let Some(session) = self.sessions.remove(&vm_id) {
            session.close();
            true
        } else {
            false
        }
    }

    /// Closes every tracked session
    pub fn close_all(&mut self) {
        for (vm_id, session) in self.sessions.drain() {
            tracing::debug!(vm = %vm_id, session = %session.id(), "closing console session");
            session.close();
        }
    }

    /// Returns the number of tracked sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns whether no sessions are tracked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Returns the number of sessions that have not reached a terminal
    /// status
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.sessions.values().filter(|s| !s.is_terminal()).count()
    }

    /// Removes sessions that already reached a terminal status
    pub fn prune_terminal(&mut self) {
        self.sessions.retain(|_, session| !session.is_terminal());
    }
}

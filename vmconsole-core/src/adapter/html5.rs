//! Direct HTML5 console adapter
//!
//! The backend supplies a complete console URL that is loaded as a
//! navigable document in the caller's frame surface. There is no protocol
//! handshake to drive; success and failure are inferred from the frame's
//! load/error callbacks. Teardown resets the frame to a neutral URL and
//! detaches its listeners.

use std::sync::Arc;

use super::ConsoleAdapter;
use crate::error::{ConsoleError, ConsoleResult};
use crate::guard::EventSink;
use crate::models::{ConsoleKind, Html5Details};
use crate::target::{FrameObserver, FrameSurface, MountTargets};

/// Adapter for backend-rendered HTML5 consoles
pub struct Html5Adapter {
    details: Html5Details,
    neutral_url: String,
    frame: Option<Arc<dyn FrameSurface>>,
}

impl Html5Adapter {
    /// Creates the adapter from its connection details
    #[must_use]
    pub const fn new(details: Html5Details, neutral_url: String) -> Self {
        Self {
            details,
            neutral_url,
            frame: None,
        }
    }
}

impl ConsoleAdapter for Html5Adapter {
    fn kind(&self) -> ConsoleKind {
        ConsoleKind::Html5
    }

    fn mount(&mut self, targets: &MountTargets) -> ConsoleResult<()> {
        if self.frame.is_some() {
            tracing::debug!("html5 adapter already mounted");
            return Ok(());
        }
        let frame = targets.frame.clone();
        frame.bind();
        self.frame = Some(frame);
        Ok(())
    }

    fn connect(&mut self, events: EventSink) -> ConsoleResult<()> {
        let Some(frame) = &self.frame else {
            return Err(ConsoleError::HandshakeFailed(
                "html5 adapter is not mounted".to_string(),
            ));
        };

        tracing::info!(url = %self.details.url, "navigating html5 console");
        frame.navigate(&self.details.url, FrameObserver::new(events));
        Ok(())
    }

    fn teardown(&mut self) {
        if let Some(frame) = self.frame.take() {
            frame.reset(&self.neutral_url);
            frame.release();
        }
    }
}

impl Drop for Html5Adapter {
    fn drop(&mut self) {
        self.teardown();
    }
}

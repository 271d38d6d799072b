//! Caller-owned mount surfaces
//!
//! The hosting UI owns the rendering surfaces (a canvas for VNC, a
//! container for WebMKS/MKS, a frame for HTML5). The live adapter only
//! borrows the surface between `mount` and `teardown` and must drop its
//! reference at teardown; no surface is ever shared between sessions.
//!
//! The core never paints pixels. Surfaces are lifecycle hooks the UI layer
//! implements; headless implementations are provided for CLI use.

use std::sync::Arc;

use crate::adapter::AdapterEvent;
use crate::guard::EventSink;

/// Rendering surface for VNC sessions (a canvas in a UI layer)
pub trait CanvasSurface: Send + Sync {
    /// Called when an adapter binds to the surface
    fn bind(&self);
    /// Called during adapter teardown
    fn release(&self);
}

/// Rendering surface for WebMKS/MKS sessions (a widget container)
pub trait ContainerSurface: Send + Sync {
    /// Called when an adapter binds to the surface
    fn bind(&self);
    /// Called during adapter teardown
    fn release(&self);
}

/// Navigable document surface for HTML5 sessions (an embedded frame).
///
/// Connection success and failure are inferred from the surface's
/// load/error callbacks, delivered through the [`FrameObserver`].
pub trait FrameSurface: Send + Sync {
    /// Called when an adapter binds to the surface
    fn bind(&self);
    /// Navigates the frame to the console URL; the observer receives the
    /// load outcome
    fn navigate(&self, url: &str, observer: FrameObserver);
    /// Resets the frame to a neutral URL and detaches load/error listeners
    fn reset(&self, neutral_url: &str);
    /// Called during adapter teardown, after `reset`
    fn release(&self);
}

/// Callback handle a [`FrameSurface`] uses to report navigation outcomes.
///
/// Events are generation-stamped; a report from a superseded attempt is
/// discarded by the resource guard.
pub struct FrameObserver {
    events: EventSink,
}

impl FrameObserver {
    pub(crate) const fn new(events: EventSink) -> Self {
        Self { events }
    }

    /// Reports that the console document finished loading
    pub fn loaded(&self) {
        self.events.emit(AdapterEvent::Connected);
    }

    /// Reports that the console document failed to load
    pub fn failed(&self, reason: impl Into<String>) {
        self.events.emit(AdapterEvent::ProtocolError(reason.into()));
    }
}

/// The caller's surfaces for one VM console view, bundled per protocol
/// family
#[derive(Clone)]
pub struct MountTargets {
    /// Canvas for VNC adapters
    pub canvas: Arc<dyn CanvasSurface>,
    /// Container for WebMKS/MKS adapters
    pub container: Arc<dyn ContainerSurface>,
    /// Frame for HTML5 adapters
    pub frame: Arc<dyn FrameSurface>,
}

impl MountTargets {
    /// Creates a bundle from caller-owned surfaces
    #[must_use]
    pub fn new(
        canvas: Arc<dyn CanvasSurface>,
        container: Arc<dyn ContainerSurface>,
        frame: Arc<dyn FrameSurface>,
    ) -> Self {
        Self {
            canvas,
            container,
            frame,
        }
    }

    /// Inert surfaces for headless use (CLI, tests).
    ///
    /// The headless frame reports every navigation as loaded; a headless
    /// run treats reaching the navigation step as the HTML5 success
    /// criterion.
    #[must_use]
    pub fn headless() -> Self {
        let null = Arc::new(NullSurface);
        Self {
            canvas: null.clone(),
            container: null.clone(),
            frame: null,
        }
    }
}

/// No-op surface used by [`MountTargets::headless`]
struct NullSurface;

impl CanvasSurface for NullSurface {
    fn bind(&self) {}
    fn release(&self) {}
}

impl ContainerSurface for NullSurface {
    fn bind(&self) {}
    fn release(&self) {}
}

impl FrameSurface for NullSurface {
    fn bind(&self) {}
    fn navigate(&self, url: &str, observer: FrameObserver) {
        tracing::debug!(url, "headless frame navigation");
        observer.loaded();
    }
    fn reset(&self, _neutral_url: &str) {}
    fn release(&self) {}
}

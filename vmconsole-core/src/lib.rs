//! `VmConsole` Core Library
//!
//! This crate provides the remote console session orchestrator used by the
//! `VmConsole` operator tooling: given the ordered console options a
//! backend reports for a VM, it establishes an interactive display session
//! over whichever protocol succeeds first, falling back transparently when
//! an attempt fails.
//!
//! # Crate Structure
//!
//! - [`models`] - Console option types and the backend descriptor
//! - [`adapter`] - Protocol adapters (VNC, WebMKS, MKS, HTML5) behind a
//!   uniform mount/connect/teardown contract
//! - [`capability`] - Injected native client capabilities and the
//!   production WebSocket transport
//! - [`guard`] - Generation-tagged resource guard (one live adapter,
//!   stale events discarded)
//! - [`driver`] - Fallback state machine over the option list
//! - [`session`] - The session façade and per-VM session manager
//! - [`target`] - Caller-owned mount surfaces
//! - [`config`] - Orchestrator settings with TOML persistence
//! - [`tracing`] - Structured logging setup and span/field names
//! - [`testing`] - Scripted clients and recording surfaces for tests
//!
//! # Guarantees
//!
//! At most one adapter holds live native resources at any time; teardown
//! of a superseded attempt is initiated before its replacement is
//! constructed; and events from a superseded attempt are discarded by
//! generation check, never observed by the fallback driver.

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod adapter;
pub mod capability;
pub mod config;
pub mod driver;
pub mod error;
pub mod guard;
pub mod models;
pub mod session;
pub mod target;
pub mod testing;
pub mod tracing;

// =============================================================================
// Convenience re-exports
//
// Flat re-exports for embedding applications and the CLI. New code should
// prefer the modular paths (e.g. `vmconsole_core::session::ConsoleSession`).
// =============================================================================

pub use adapter::{
    AdapterEvent, ConsoleAdapter, Html5Adapter, MksAdapter, VncAdapter, WebmksAdapter,
    build_mks_proxy_url, build_mks_proxy_url_redacted, build_vnc_proxy_url,
    build_vnc_proxy_url_redacted, build_webmks_url, build_webmks_url_redacted,
};
pub use capability::{
    CapabilityProvider, CapabilityReport, ClientHandle, ClientRequest, RemoteClient,
    StaticCapabilities, WebSocketTransport, availability_report,
};
pub use config::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_FALLBACK_DELAY_MS, DEFAULT_NEUTRAL_FRAME_URL,
    OrchestratorConfig,
};
pub use driver::{DriverState, DriverStep, FallbackDriver, NO_OPTIONS_ERROR};
pub use error::{ConfigError, ConfigResult, ConsoleError, ConsoleResult};
pub use guard::{AttemptOutcome, EventSink, ResourceGuard, TaggedEvent};
pub use models::{
    ConnectionDetails, ConsoleKind, ConsoleOption, Html5Details, MksDetails, VmConsoleDescriptor,
    VncDetails, WebmksDetails,
};
pub use session::{ConsoleSession, SessionManager, SessionStatus};
pub use target::{CanvasSurface, ContainerSurface, FrameObserver, FrameSurface, MountTargets};
pub use tracing::{TracingConfig, TracingError, TracingLevel, TracingResult, init_tracing};

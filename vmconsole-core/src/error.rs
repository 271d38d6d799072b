//! Error types for the console orchestrator
//!
//! A single failure taxonomy covers every protocol adapter. The variants
//! exist for operator-facing diagnostics and logging; the fallback driver
//! treats every one of them identically (advance to the next console
//! option), so none of them carries differentiated control flow.

use thiserror::Error;

/// Failure taxonomy for console attempts.
///
/// Adapter-level errors never cross the resource guard boundary as raw
/// errors or panics; they are folded into `Failed` attempt outcomes
/// carrying one of these variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// A required native client capability is missing at attempt time
    #[error("required native client is unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Instantiation or connect failed before the session was established
    #[error("console handshake failed: {0}")]
    HandshakeFailed(String),

    /// Authentication or TLS validation was rejected
    #[error("console security failure: {0}")]
    SecurityFailure(String),

    /// The connection dropped before or without a clean close
    #[error("console connection dropped: {0}")]
    AbruptDisconnect(String),

    /// The console document failed to load
    #[error("console document failed to load: {0}")]
    LoadFailure(String),

    /// The option list is structurally invalid (programming error; the
    /// only failure `open()` surfaces synchronously)
    #[error("invalid console options: {0}")]
    InvalidOptions(String),

    /// The session event channel closed unexpectedly
    #[error("console event channel closed")]
    ChannelClosed,
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Errors raised while loading or persisting orchestrator settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the settings file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid TOML
    #[error("failed to parse settings: {0}")]
    Parse(String),

    /// The settings could not be serialized
    #[error("failed to serialize settings: {0}")]
    Serialize(String),
}

/// Result type for settings operations
pub type ConfigResult<T> = Result<T, ConfigError>;

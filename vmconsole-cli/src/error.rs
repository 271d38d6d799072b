//! CLI error types and exit codes.

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, validation, or other non-connection
    /// errors
    pub const GENERAL_ERROR: i32 = 1;
    /// Connection failure - every console option failed
    pub const CONNECTION_FAILURE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Settings error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Descriptor parse or validation error
    #[error("Descriptor error: {0}")]
    Descriptor(String),

    /// Console session error
    #[error("Console error: {0}")]
    Console(String),

    /// Every console option failed
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, descriptor, IO)
    /// - 2: Connection failure (all console options exhausted)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Connection(_) => exit_codes::CONNECTION_FAILURE,
            Self::Config(_) | Self::Descriptor(_) | Self::Console(_) | Self::Io(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }
}

//! Core data structures for the console orchestrator
//!
//! The types in this module mirror the backend wire contract: a VM console
//! descriptor carries an ordered list of console options, each tagged with
//! a protocol kind and its connection parameters. Options are immutable
//! once received and owned by the session for its lifetime.

mod console;

pub use console::{
    ConnectionDetails, ConsoleKind, ConsoleOption, Html5Details, MksDetails, VmConsoleDescriptor,
    VncDetails, WebmksDetails,
};

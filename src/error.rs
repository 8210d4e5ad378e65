//! Error types for pyload.

use std::ffi::NulError;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced while loading a library or dispatching into it.
///
/// Failures raised inside the foreign interpreter (exceptions and the like)
/// are not represented here. They only show up through the foreign return
/// values handed back to the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Interpreter library not found (searched for: {})", .searched.join(", "))]
    LibraryNotFound { searched: Vec<String> },

    #[error("Failed to load library '{}': {source}", .path.display())]
    LibraryLoad {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("Failed to unload library '{}': {source}", .path.display())]
    LibraryUnload {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("Symbol '{name}' not found")]
    SymbolNotFound {
        name: String,
        #[source]
        source: Option<libloading::Error>,
    },

    #[error("Invalid symbol name: {name:?}")]
    InvalidSymbol { name: String },

    #[error("String argument contains an interior NUL byte: {0}")]
    InvalidString(#[from] NulError),

    #[error("Session is still shared with other handles")]
    SessionInUse,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for pyload operations.
pub type Result<T> = std::result::Result<T, Error>;

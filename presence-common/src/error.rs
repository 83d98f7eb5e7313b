//! Common error types for the presence analyzer

use thiserror::Error;

/// Common result type for presence analyzer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole operation
///
/// Per-row attendance problems never end up here; see [`crate::records::RowError`].
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Structurally invalid user directory document
    #[error("Directory parse error: {0}")]
    Directory(#[from] quick_xml::DeError),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested user not present in the loaded data
    #[error("Not found: {0}")]
    NotFound(String),
}

//! Error types for filedir-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from filedir-core
    #[error(transparent)]
    Core(#[from] filedir_core::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failed to encode a report
    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to initialize logging: {message}")]
    Logging { message: String },
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Preferences error: {0}")]
    Preferences(#[from] serde_json::Error),

    #[error("Source {source_name} failed: {message}")]
    Source {
        source_name: String,
        message: String,
    },

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("View engine is no longer running")]
    EngineClosed,

    #[error("Recompute of generation {generation} failed: {message}")]
    Recompute { generation: u64, message: String },
}

pub type Result<T> = std::result::Result<T, LibraryError>;

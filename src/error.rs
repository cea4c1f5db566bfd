use std::path::PathBuf;

/// Result type for catalog update operations
pub type Result<T> = std::result::Result<T, UpdaterError>;

/// Fatal errors for a catalog update run
#[derive(thiserror::Error, Debug)]
pub enum UpdaterError {
    #[error("Malformed catalog {path}: {reason}")]
    MalformedInput { path: PathBuf, reason: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Update pass aborted after lookup failure for '{name}': {cause}")]
    Aborted { name: String, cause: LookupError },
}

impl UpdaterError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::MalformedInput {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure of a single video lookup. Never fatal on its own.
#[derive(thiserror::Error, Debug, Clone)]
pub enum LookupError {
    /// Network failure, timeout, or unreadable body
    #[error("request failed: {0}")]
    Request(String),

    /// Search endpoint answered with a non-success status
    #[error("search endpoint returned HTTP {0}")]
    Status(u16),

    /// The HTTP client could not be built or the URL was unusable
    #[error("client error: {0}")]
    Client(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            LookupError::Client(err.to_string())
        } else {
            LookupError::Request(err.to_string())
        }
    }
}

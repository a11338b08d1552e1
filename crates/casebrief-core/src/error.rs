//! Error types for casebrief

/// Result type alias using casebrief's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for casebrief operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Detector or rule evaluation errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Rejected input (bad confidence score, mixed batch, ...)
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced record or document does not exist
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up
        kind: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// Record sink failures
    #[error("store error: {0}")]
    Store(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new not-found error
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Create a new store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error means the referenced record is missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

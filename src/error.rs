use thiserror::Error;

/// Errors raised while reading, converting, merging or writing backups
#[derive(Debug, Error)]
pub enum BackupError {
    /// Format identifier not known to the schema registry
    #[error("Unrecognized backup format: {0}")]
    UnrecognizedFormat(String),

    /// A generic record did not fit the target message shape
    #[error("Conversion error at {path}: {reason}")]
    Conversion { path: String, reason: String },

    /// Empty merge input, malformed identity key, mismatched format tag
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// One input of a merge batch failed; `index` is its position in the batch
    #[error("Merge input #{index} failed: {source}")]
    MergeInput {
        index: usize,
        #[source]
        source: Box<BackupError>,
    },

    /// Corrupt or truncated protobuf payload
    #[error("Decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl BackupError {
    pub fn conversion(path: impl Into<String>, reason: impl Into<String>) -> Self {
        BackupError::Conversion {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Index of the failing input when this error came out of a merge
    pub fn merge_input_index(&self) -> Option<usize> {
        match self {
            BackupError::MergeInput { index, .. } => Some(*index),
            _ => None,
        }
    }
}

pub type Result<T, E = BackupError> = std::result::Result<T, E>;

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> Result<T, BackupError>;
}

impl<T, E: Into<BackupError>> ErrorContext<T> for Result<T, E> {
    fn context(self, msg: &str) -> Result<T, BackupError> {
        self.map_err(|e| {
            let err: BackupError = e.into();
            match err {
                BackupError::Other(s) => BackupError::Other(format!("{}: {}", msg, s)),
                BackupError::Config(s) => BackupError::Config(format!("{}: {}", msg, s)),
                BackupError::InvalidInput(s) => {
                    BackupError::InvalidInput(format!("{}: {}", msg, s))
                }
                BackupError::Io(e) => {
                    BackupError::Io(std::io::Error::new(e.kind(), format!("{}: {}", msg, e)))
                }
                other => other,
            }
        })
    }
}

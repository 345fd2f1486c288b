use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeoDiffError>;

/// Everything that can stop a comparison from producing a result.
///
/// None of these are recovered locally: they travel up to the caller unchanged
/// and a comparison either yields a complete `ComparisonResult` or nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeoDiffError {
    /// The external diff engine could not produce raw changes.
    #[error("diff engine error: {message}")]
    Engine { message: String },

    /// An operation token outside the known vocabulary. Usually means the
    /// engine version does not match what this tool was built against.
    #[error("unrecognized change type {token:?} in record #{index}")]
    UnrecognizedChangeType { index: usize, token: String },

    #[error("invalid change record #{index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

impl GeoDiffError {
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine {
            message: msg.into(),
        }
    }

    pub fn unrecognized(index: usize, token: impl Into<String>) -> Self {
        Self::UnrecognizedChangeType {
            index,
            token: token.into(),
        }
    }

    pub fn invalid_record(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            index,
            reason: reason.into(),
        }
    }
}

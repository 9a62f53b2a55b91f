use std::fmt::{self, Display};

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug)]
pub enum EngineError {
    /// Error occurred during an IO operation.
    IoError(std::io::Error),
    /// The dataset could not be parsed as a list of emote records.
    DataFormat(serde_json::Error),
    /// A record declared a kind outside of the known emote sources.
    InvalidRecordKind(i64),
    /// Custom error
    Custom(String),
}

impl Clone for EngineError {
    fn clone(&self) -> Self {
        use EngineError::*;

        match self {
            InvalidRecordKind(kind) => InvalidRecordKind(*kind),
            Custom(err) => Custom(err.clone()),
            _ => Custom(self.to_string()),
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(other: std::io::Error) -> Self {
        Self::IoError(other)
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(other: serde_json::Error) -> Self {
        Self::DataFormat(other)
    }
}

impl Display for EngineError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EngineError::IoError(err) => write!(fmt, "An IO error occurred: {}", err),
            EngineError::DataFormat(err) => write!(fmt, "Emote dataset is malformed: {}", err),
            EngineError::InvalidRecordKind(kind) => {
                write!(fmt, "Emote kind {} is not a known emote source.", kind)
            }
            EngineError::Custom(msg) => write!(fmt, "{}", msg),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::IoError(err) => Some(err),
            EngineError::DataFormat(err) => Some(err),
            _ => None,
        }
    }
}

use crate::db::error::DatabaseError;

#[derive(thiserror::Error, Debug)]
pub enum ProgressError {
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("Failed reading from the remote store")]
    RemoteRead(#[source] DatabaseError),
    #[error("Failed writing to the remote store")]
    RemoteWrite(#[source] DatabaseError),
    #[error("Progress {0} is out of range")]
    InvalidProgress(u8),
    #[error("Exercise response cannot be encoded")]
    InvalidResponse(#[source] serde_json::Error),
}

#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthenticated,
    RemoteReadFailure,
    RemoteWriteFailure,
    InvalidInput,
}

/// What the store remembers about its most recent failure.
#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LastError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ProgressError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProgressError::Unauthenticated => ErrorKind::Unauthenticated,
            ProgressError::RemoteRead(_) => ErrorKind::RemoteReadFailure,
            ProgressError::RemoteWrite(_) => ErrorKind::RemoteWriteFailure,
            ProgressError::InvalidProgress(_) | ProgressError::InvalidResponse(_) => {
                ErrorKind::InvalidInput
            }
        }
    }
}

impl From<&ProgressError> for LastError {
    fn from(error: &ProgressError) -> Self {
        let message = match std::error::Error::source(error) {
            Some(cause) => format!("{}: {}", error, cause),
            None => error.to_string(),
        };

        LastError {
            kind: error.kind(),
            message,
        }
    }
}

use axum::{http::StatusCode, response::IntoResponse};
use validator::ValidationErrors;

use crate::{
    auth::error::AuthError,
    db::error::DatabaseError,
    exercise::ExerciseError,
    model::ChapterId,
    progress::ProgressError,
};

#[derive(thiserror::Error, Debug)]
pub enum ChapterError {
    #[error("Chapter {0} not found")]
    NotFound(ChapterId),
    #[error("Chapter {0} is locked")]
    Locked(ChapterId),
    #[error("Chapter {chapter_id} has {pending} pending exercises")]
    ExercisesPending { chapter_id: ChapterId, pending: usize },
    #[error("Exercise {0} not found")]
    ExerciseNotFound(String),
    #[error(transparent)]
    Exercise(#[from] ExerciseError),
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Database error")]
    Database(DatabaseError),

    #[error("Auth error")]
    Auth(AuthError),

    #[error("Validation error")]
    Validation(ValidationErrors),

    #[error("Progress error")]
    Progress(ProgressError),

    #[error("Chapter error")]
    Chapter(ChapterError),

    #[error("Other error: {0}")]
    Other(anyhow::Error),
}

impl From<DatabaseError> for Error {
    fn from(value: DatabaseError) -> Self {
        Self::Database(value)
    }
}

impl From<ProgressError> for Error {
    fn from(value: ProgressError) -> Self {
        Self::Progress(value)
    }
}

impl From<ChapterError> for Error {
    fn from(value: ChapterError) -> Self {
        Self::Chapter(value)
    }
}

fn database_error_response(error: DatabaseError) -> axum::response::Response {
    match error {
        DatabaseError::NotFound => StatusCode::NOT_FOUND.into_response(),
        DatabaseError::Unavailable(message) => {
            tracing::error!(err.msg = %message, "Store unavailable");

            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
        error => {
            tracing::error!(err.msg = %error, err.details = ?error, "Database Error");

            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            Error::Database(database_error) => database_error_response(database_error),
            Error::Auth(auth_error) => match auth_error {
                AuthError::JwtError(error) => {
                    tracing::error!(err.msg = %error, err.details = ?error, "JWT Error");

                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
                AuthError::PasswordError(error) => {
                    tracing::error!(err.msg = %error, err.details = ?error, "Password Hash Error");

                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
                AuthError::Unauthenticated
                | AuthError::AccountNotFound
                | AuthError::IncorrectCredential => StatusCode::UNAUTHORIZED.into_response(),
            },
            Error::Progress(progress_error) => match progress_error {
                ProgressError::Unauthenticated => StatusCode::UNAUTHORIZED.into_response(),
                ProgressError::RemoteRead(error) | ProgressError::RemoteWrite(error) => {
                    database_error_response(error)
                }
                error @ (ProgressError::InvalidProgress(_) | ProgressError::InvalidResponse(_)) => {
                    (StatusCode::BAD_REQUEST, error.to_string()).into_response()
                }
            },
            Error::Chapter(chapter_error) => {
                let status = match chapter_error {
                    ChapterError::NotFound(_) | ChapterError::ExerciseNotFound(_) => {
                        StatusCode::NOT_FOUND
                    }
                    ChapterError::Locked(_) => StatusCode::FORBIDDEN,
                    ChapterError::ExercisesPending { .. } => StatusCode::CONFLICT,
                    ChapterError::Exercise(_) => StatusCode::BAD_REQUEST,
                };

                (status, chapter_error.to_string()).into_response()
            }
            Error::Other(error) => {
                tracing::error!(err.msg = %error, err.details = ?error, "Other Error");

                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            Error::Validation(validation_error) => {
                tracing::warn!(err.msg = %validation_error, "Validation Error");

                (StatusCode::BAD_REQUEST, validation_error.to_string()).into_response()
            }
        }
    }
}

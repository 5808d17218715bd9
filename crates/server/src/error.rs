use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub enum Error {
    // Classified core outcome
    Core(chirp_core::Error),

    // Generic
    BadRequest(String),
    Internal(String),
}

pub type Result<T> = core::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        use chirp_core::Error as Core;

        let (status, error_message) = match self {
            Error::Core(err) => match err {
                Core::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
                Core::AlreadyExists => (StatusCode::CONFLICT, "Already exists".to_string()),
                Core::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
                Core::BodyTooLong { .. } => (StatusCode::BAD_REQUEST, "Chirp is too long".to_string()),
                err if err.is_credential_failure() => {
                    (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
                }
                err => internal(&err.to_string()),
            },
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Internal(msg) => internal(&msg),
        };

        let body = Json(json!({ "error": error_message }));

        (status, body).into_response()
    }
}

/// Log the detail; the client only sees a generic message.
fn internal(detail: &str) -> (StatusCode, String) {
    error!("Internal error: {}", detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Something went wrong".to_string(),
    )
}

impl From<chirp_core::Error> for Error {
    fn from(err: chirp_core::Error) -> Self {
        Error::Core(err)
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Internal(err.to_string())
    }
}

/// Run a synchronous core call off the async executor.
pub async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> chirp_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

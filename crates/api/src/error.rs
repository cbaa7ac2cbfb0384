use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use noteroom_core::error::CoreError;
use noteroom_db::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers and WebSocket dispatch.
///
/// Wraps [`CoreError`] for domain errors and adds transport-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses; [`AppError::classify`] gives the same mapping to the
/// WebSocket `note_error` frame.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `noteroom_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A request body that could not be read as the expected JSON.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Core(err.into())
    }
}

impl AppError {
    /// Map the error to an HTTP status, a stable error code, and a message
    /// safe to show to clients.
    ///
    /// Persistence and internal failures are logged here and replaced by a
    /// generic message.
    pub fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => match core {
                CoreError::UnknownAuthor(name) => (
                    StatusCode::BAD_REQUEST,
                    "UNKNOWN_AUTHOR",
                    format!("Unknown author '{name}'"),
                ),
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Persistence(msg) => {
                    tracing::error!(error = %msg, "Persistence error");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "PERSISTENCE_ERROR",
                        "The note store is unavailable".to_string(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

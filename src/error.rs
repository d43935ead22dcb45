use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

/// Request-time failures. Client input errors carry the violated field in
/// their message; everything else collapses to a generic 500 so no internal
/// detail reaches the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Messages limit reached ({0})")]
    MessageLimitReached(usize),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("model request failed: {0}")]
    Model(String),

    #[error("mail request failed: {0}")]
    Mail(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::MessageLimitReached(_) => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::Database(err) => {
                error!("database error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_owned())
            }
            AppError::Model(err) => {
                error!("model request failed: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_owned())
            }
            AppError::Mail(err) => {
                error!("mail request failed: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_owned())
            }
            AppError::Internal(err) => {
                error!("internal error: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_owned())
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

use axum::{
    Json, debug_handler,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::info;

use crate::{AppError, AppResult, db};

/// `POST /api/chat/reset` with `{user_id}`. Wipes the chat history but keeps
/// the user row; 205 with the now-empty history.
#[debug_handler]
pub(crate) async fn reset(
    State(db_pool): State<SqlitePool>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    let Some(user_id) = body
        .get("user_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
    else {
        return Err(AppError::BadRequest("Invalid User ID".to_owned()));
    };

    if !db::user_exists(&db_pool, user_id).await? {
        return Err(AppError::BadRequest("Invalid User ID".to_owned()));
    }

    db::reset_messages(&db_pool, user_id).await?;
    info!("chat history reset for user {user_id}");

    let messages = db::get_messages(&db_pool, user_id).await?;
    Ok((StatusCode::RESET_CONTENT, Json(messages)).into_response())
}

use axum::{
    Json, debug_handler,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::{AppError, AppResult, db};

#[derive(Deserialize)]
pub(crate) struct HistoryQuery {
    user_id: Option<String>,
}

/// `GET /api/chat?user_id=<id>`. An unknown user is not an error: the
/// widget polls before the first message is ever sent, so it gets 204.
#[debug_handler]
pub(crate) async fn history(
    State(db_pool): State<SqlitePool>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Response> {
    let Some(user_id) = query.user_id.filter(|id| !id.is_empty()) else {
        return Err(AppError::BadRequest("Invalid User ID format".to_owned()));
    };

    if !db::user_exists(&db_pool, &user_id).await? {
        warn!("user {user_id} not found, returning empty history");
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let messages = db::get_messages(&db_pool, &user_id).await?;
    Ok((StatusCode::OK, Json(messages)).into_response())
}

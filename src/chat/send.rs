use axum::{
    Json, debug_handler,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    AppError, AppResult, AppState, db, identity,
    llm::{ChatRole, ChatTurn},
};

/// `POST /api/chat` with `{user_id, message: {role, content}}`.
///
/// The payload is pulled apart by hand so every shape violation maps to 400
/// rather than an extractor 422. The incoming role must be one of the two
/// enumerated values, but the persisted turn is always the visitor's (`user`).
///
/// The cap check runs after the user turn is appended: at the limit the turn
/// is kept, the model is never invoked, and the caller gets 403 until reset.
#[debug_handler]
pub(crate) async fn send(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    let Some(user_id) = body
        .get("user_id")
        .and_then(Value::as_str)
        .filter(|id| identity::is_uuid_v4(id))
    else {
        return Err(AppError::BadRequest("Invalid user ID".to_owned()));
    };

    let message = body.get("message");
    let role = message
        .and_then(|message| message.get("role"))
        .and_then(Value::as_str)
        .and_then(ChatRole::from_name);
    let content = message
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty());
    let (Some(_role), Some(content)) = (role, content) else {
        return Err(AppError::BadRequest("Invalid message format".to_owned()));
    };

    if !db::user_exists(&state.db_pool, user_id).await? {
        debug!("creating user {user_id}");
        db::add_user(&state.db_pool, user_id, None, None).await?;
    }

    db::add_message(&state.db_pool, user_id, ChatRole::User, content).await?;

    let messages = db::get_messages(&state.db_pool, user_id).await?;
    if messages.len() >= state.policy.max_messages {
        info!(
            "message limit reached ({}) for user {user_id}",
            state.policy.max_messages
        );
        return Err(AppError::MessageLimitReached(state.policy.max_messages));
    }

    let history: Vec<ChatTurn> = messages.iter().map(ChatTurn::from).collect();
    let reply = state.agent.get_response(&history).await?;
    db::add_message(&state.db_pool, user_id, ChatRole::Assistant, &reply).await?;

    let messages = db::get_messages(&state.db_pool, user_id).await?;
    Ok((StatusCode::CREATED, Json(messages)).into_response())
}

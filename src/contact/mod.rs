mod mailer;

pub use mailer::Mailer;

use axum::{
    Json, debug_handler,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{AppError, AppResult, AppState, db, identity};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit))
}

/// `POST /api/contact` with `{user: {id, name?, email?}, contact: {userId,
/// message}}`. Both sub-objects validate independently before anything is
/// written; the user is created or partially updated, the contact message is
/// appended, and the email notification is best-effort.
#[debug_handler]
async fn submit(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    let user = body.get("user");
    let Some(user_id) = user
        .and_then(|user| user.get("id"))
        .and_then(Value::as_str)
        .filter(|id| identity::is_uuid_v4(id))
    else {
        return Err(AppError::BadRequest("Invalid user format".to_owned()));
    };
    let name = optional_str(user, "name")
        .map_err(|()| AppError::BadRequest("Invalid user format".to_owned()))?;
    let email = optional_str(user, "email")
        .map_err(|()| AppError::BadRequest("Invalid user format".to_owned()))?;

    let contact = body.get("contact");
    let contact_user_id = contact
        .and_then(|contact| contact.get("userId"))
        .and_then(Value::as_str)
        .filter(|id| identity::is_uuid_v4(id));
    let message = contact
        .and_then(|contact| contact.get("message"))
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty());
    let (Some(contact_user_id), Some(message)) = (contact_user_id, message) else {
        return Err(AppError::BadRequest("Invalid contact format".to_owned()));
    };

    if !db::user_exists(&state.db_pool, user_id).await? {
        db::add_user(&state.db_pool, user_id, name, email).await?;
    } else {
        db::update_user(&state.db_pool, user_id, name, email).await?;
    }

    let saved = db::add_contact_message(&state.db_pool, contact_user_id, message).await?;
    info!("new contact form saved (id {})", saved.id);

    if let Some(mailer) = &state.mailer {
        if let Err(err) = mailer.notify_contact(name, email, message).await {
            warn!("contact notification email failed: {err}");
        }
    }

    Ok((StatusCode::CREATED, Json(json!({}))).into_response())
}

/// `Ok(None)` when absent or null, `Err` when present but not a string.
fn optional_str<'a>(object: Option<&'a Value>, field: &str) -> Result<Option<&'a str>, ()> {
    match object.and_then(|object| object.get(field)) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(()),
    }
}

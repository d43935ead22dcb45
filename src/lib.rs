pub mod agent;
pub mod chat;
pub mod config;
pub mod contact;
pub mod db;
pub mod error;
pub mod identity;
pub mod llm;
pub mod portfolio;
pub mod prompt;
pub mod res;

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::{agent::TwinAgent, contact::Mailer};

pub use crate::error::{AppError, AppResult};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub agent: Arc<TwinAgent>,
    pub mailer: Option<Arc<Mailer>>,
    pub policy: ChatPolicy,
}

/// Limits enforced by the chat routes.
#[derive(Clone, Copy)]
pub struct ChatPolicy {
    /// Total stored turns (user + assistant) allowed per user before further
    /// input is rejected with 403 until the conversation is reset.
    pub max_messages: usize,
}

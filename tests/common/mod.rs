#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use twinsite::{
    AppResult, AppState, ChatPolicy,
    agent::TwinAgent,
    chat, contact, db,
    llm::{AiApi, ChatTurn},
};

pub const STUB_REPLY: &str = "Happy to help!";

/// Canned backend so no request ever leaves the process.
pub struct StubApi;

#[async_trait]
impl AiApi for StubApi {
    async fn get_response(&self, _messages: &[ChatTurn]) -> AppResult<String> {
        Ok(STUB_REPLY.to_owned())
    }
}

pub struct TestApp {
    pub router: Router,
    pub db_pool: SqlitePool,
    _dir: tempfile::TempDir,
}

pub async fn spawn(max_messages: usize) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}/test.db", dir.path().display());
    let db_pool = db::connect(&url).await.expect("connect");

    let agent = TwinAgent::with_api("You are a test twin.".to_owned(), Box::new(StubApi));
    let state = AppState {
        db_pool: db_pool.clone(),
        agent: Arc::new(agent),
        mailer: None,
        policy: ChatPolicy { max_messages },
    };

    let router = Router::new()
        .nest("/api/chat", chat::router())
        .nest("/api/contact", contact::router())
        .with_state(state);

    TestApp {
        router,
        db_pool,
        _dir: dir,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}

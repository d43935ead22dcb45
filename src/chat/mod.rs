mod history;
mod reset;
mod send;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(history::history).post(send::send))
        .route("/reset", post(reset::reset))
}

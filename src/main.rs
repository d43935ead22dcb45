use std::sync::Arc;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;
use twinsite::{
    AppState, ChatPolicy,
    agent::TwinAgent,
    chat,
    config::Config,
    contact::{self, Mailer},
    db,
    portfolio::Portfolio,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("twinsite=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let portfolio = Portfolio::embedded()?;
    tracing::info!(
        "starting as the digital twin of {} ({} / {})",
        portfolio.owner_name(),
        config.provider,
        config.model
    );

    let db_pool = db::connect(&config.database_url).await?;
    let agent = TwinAgent::new(&config, &portfolio)?;
    let mailer = Mailer::from_config(&config).map(Arc::new);
    if mailer.is_none() {
        tracing::warn!("mailjet credentials not configured, contact notifications disabled");
    }

    let app_state = AppState {
        db_pool,
        agent: Arc::new(agent),
        mailer,
        policy: ChatPolicy {
            max_messages: config.max_messages,
        },
    };

    let app = Router::new()
        .nest("/api/chat", chat::router())
        .nest("/api/contact", contact::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!("serving on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

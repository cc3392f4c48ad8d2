use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::post, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roundtable::config::BotConfig;
use roundtable::sheets::{SheetsClient, SheetsConfig};
use roundtable::state::AppState;
use roundtable::tasks;
use roundtable::telegram::webhook::{telegram_webhook, WebhookContext};
use roundtable::telegram::BotApi;

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roundtable=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting roundtable...");

    let config = match BotConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("bot configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let sheets_config = match SheetsConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("sheets configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let source = match SheetsClient::new(sheets_config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("failed to build sheets client: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState::new(source.clone());

    // Initial loads; a cold start with an unreachable sheet keeps running
    // on an empty pool until an admin /update succeeds
    if let Err(e) = state.refresh_question_pool().await {
        tracing::warn!("initial question fetch failed, pool is empty: {}", e);
    }
    state.reload_admin_ids().await;

    let bot = match BotApi::new(&config.token) {
        Ok(b) => b,
        Err(e) => {
            tracing::error!("failed to build bot client: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = bot.set_webhook(&config.webhook_url()).await {
        tracing::error!("failed to register webhook: {}", e);
        std::process::exit(1);
    }

    let usage = tasks::spawn_usage_logger(source);
    tasks::spawn_keep_alive(config.ping_url());

    let ctx = Arc::new(WebhookContext {
        app: state,
        bot,
        usage,
        webhook_token: config.token.clone(),
    });

    let app = Router::new()
        .route("/webhook/{token}", post(telegram_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server exited with error: {}", e);
        std::process::exit(1);
    }
}

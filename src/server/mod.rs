//! Gateway HTTP server

pub mod handlers;

use crate::config::GatewayConfig;
use crate::ChatGateway;
use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;

pub use handlers::AppState;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/models", get(handlers::list_models))
        .route("/chat", get(handlers::chat_query).post(handlers::chat_body))
        .route("/health", get(handlers::health_check))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
}

/// Start the gateway server and run until Ctrl-C
pub async fn start_server(config: GatewayConfig) -> anyhow::Result<()> {
    let gateway = ChatGateway::from_config(&config)?;
    info!(
        "Loaded {} API keys and {} model aliases, upstream {}",
        gateway.key_pool().len(),
        gateway.registry().len(),
        config.base_url
    );

    let app = build_router(AppState::new(gateway, config.author.as_str()));

    let addr: SocketAddr = config.listen_addr().parse()?;
    info!("Starting gateway on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Logging middleware
async fn logging_middleware(req: Request, next: Next) -> axum::response::Response {
    let start = Instant::now();
    let method = req.method().clone();
    // Path only: the query string carries the prompt
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    info!("{} {} {} {:?}", method, path, response.status(), start.elapsed());

    response
}

//! Router assembly and server loop

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{delete_chat, health, post_chat};
use crate::origin::check_origin;
use crate::state::AppState;

/// Build the gateway router. The origin layer wraps every verb on the
/// chat route.
pub fn build_router(state: AppState) -> Router {
    let chat = Router::new()
        .route("/api/chat", post(post_chat).delete(delete_chat))
        .layer(middleware::from_fn_with_state(state.clone(), check_origin));

    Router::new()
        .merge(chat)
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Serve the gateway until a shutdown signal arrives
pub async fn run_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);

    let ip: std::net::IpAddr = host.parse()?;
    let addr = SocketAddr::from((ip, port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

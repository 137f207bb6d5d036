mod error;
mod llm;
mod rate_limit;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env file is the normal production case.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("server=info,tower_http=info")))
        .init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Initialize LLM client (non-fatal: the site answers offline if config is missing).
    let limits = llm::config::AiLimits::from_env();
    let state = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), timeout_secs = limits.timeout_secs, "LLM client initialized");
            state::AppState::live(client, limits)
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured; assistant answers offline");
            state::AppState::offline()
        }
    };

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "intake server listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .expect("server failed");
}

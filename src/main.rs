use anyhow::Result;
use tracing_subscriber::EnvFilter;

use nutriplan_api::config::config;
use nutriplan_api::routes;
use nutriplan_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config();
    let state = AppState::new();
    let app = routes::app(state);

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("nutriplan-api listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

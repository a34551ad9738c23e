//! Tax engine HTTP server.
//!
//! Environment:
//!
//! - `TAX_ENGINE_CONFIG`: rule table directory; the compiled-in tables are
//!   used when unset.
//! - `PORT`: listen port, default 8080.
//! - `RUST_LOG`: tracing filter, default `info`.

use tax_engine::api::{AppState, create_router};
use tax_engine::config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("TAX_ENGINE_CONFIG") {
        Ok(path) => ConfigLoader::load(&path).map_err(|e| {
            tracing::error!("Failed to load rule tables from {path}: {e}");
            e
        })?,
        Err(_) => ConfigLoader::builtin()?,
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let metadata = config.tables().metadata();
    tracing::info!(
        fiscal_year = %metadata.fiscal_year,
        effective_from = %metadata.effective_from,
        effective_to = %metadata.effective_to,
        "Rule tables loaded"
    );

    let app = create_router(AppState::new(config));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Tax engine listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

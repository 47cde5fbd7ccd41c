use ott_finder_api::{
    api::{create_router, AppState},
    config::Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ott_finder_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Initialize application state
    let state = AppState::from_config(&config);

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}

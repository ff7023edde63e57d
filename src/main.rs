use std::error::Error;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dekost_be::config::{Settings, DEFAULT_LOG_FILTER};
use dekost_be::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment dari .env file
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = create_app(AppState::default(), settings.frontend_dir.as_deref());

    let addr = settings.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

use anyhow::Result;
use job_assistant::environment::EnvironmentConfig;
use job_assistant::start_web_server;

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("job_assistant=info,rocket=warn")),
        )
        .init();

    let port = std::env::var("JOBSCOUT_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .map_err(|_| anyhow::anyhow!("JOBSCOUT_PORT must be a valid port number"))?;

    let config = EnvironmentConfig::load()?;
    config.ensure_directories().await?;

    info!("Starting job-search assistant API server");
    info!(
        "Environment: {}",
        std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
    );
    info!("Database: {}", config.database_path.display());
    info!("Server: http://0.0.0.0:{}", port);

    start_web_server(config.database_path, port).await
}

use anyhow::Result;
use clima::{ClimaConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClimaConfig::load()?;
    logging::init(&config.logging)?;

    tracing::info!("Starting clima v{}", clima::VERSION);
    web::run(config).await
}

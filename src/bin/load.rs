use anyhow::Result;
use tracing::info;

use review_harvest::config::Config;
use review_harvest::loader;
use review_harvest::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    info!("Starting load");

    let config = Config::load()?;
    let summary = loader::run(&config).await?;

    info!(
        "Loaded {} of {} products into {}",
        summary.inserted, summary.loaded, config.database.table
    );
    Ok(())
}

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use review_harvest::browser::Browser;
use review_harvest::config::{Config, SiteConfig};
use review_harvest::harvester::{write_json_atomically, Harvester};
use review_harvest::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    info!("Starting review harvest");

    let config = Config::load()?;
    let browser = open_browser(&config.site)
        .await
        .context("Failed to start browser session")?;

    let output = config.output.json_path.clone();
    let report = Harvester::new(config, browser).run().await;

    write_json_atomically(Path::new(&output), &report.records)
        .with_context(|| format!("Failed to write {}", output))?;
    info!("Wrote {} products to {}", report.records.len(), output);

    Ok(())
}

#[cfg(feature = "webdriver")]
async fn open_browser(site: &SiteConfig) -> Result<Box<dyn Browser>> {
    use review_harvest::browser::WebDriverBrowser;

    Ok(Box::new(WebDriverBrowser::connect(site).await?))
}

#[cfg(not(feature = "webdriver"))]
async fn open_browser(site: &SiteConfig) -> Result<Box<dyn Browser>> {
    use review_harvest::browser::HttpBrowser;

    Ok(Box::new(HttpBrowser::new(site)?))
}

use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use tracing::info;

use super::{random_user_agent, Browser};
use crate::config::SiteConfig;
use crate::error::HarvestError;

/// A real browser session behind a WebDriver endpoint.
pub struct WebDriverBrowser {
    client: Client,
}

impl WebDriverBrowser {
    pub async fn connect(site: &SiteConfig) -> Result<Self, HarvestError> {
        let user_agent = random_user_agent(&site.user_agents);
        let args = json!(["--no-sandbox", format!("--user-agent={}", user_agent)]);

        let mut capabilities = serde_json::Map::new();
        capabilities.insert("ms:edgeOptions".to_string(), json!({ "args": args }));
        capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        info!("Connecting to webdriver at {}", site.webdriver_url);
        let client = ClientBuilder::native()
            .capabilities(capabilities)
            .connect(&site.webdriver_url)
            .await
            .map_err(|e| HarvestError::Session(e.to_string()))?;

        Ok(Self { client })
    }
}

fn session_error(e: CmdError) -> HarvestError {
    HarvestError::Session(e.to_string())
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn navigate(&mut self, url: &str) -> Result<(), HarvestError> {
        self.client.goto(url).await.map_err(|e| HarvestError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), HarvestError> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
        {
            Ok(_) => Ok(()),
            Err(CmdError::WaitTimeout) => Err(HarvestError::timeout(selector, timeout)),
            Err(e) => Err(session_error(e)),
        }
    }

    async fn page_source(&mut self) -> Result<String, HarvestError> {
        self.client.source().await.map_err(session_error)
    }

    async fn scroll_height(&mut self) -> Result<u64, HarvestError> {
        let height = self
            .client
            .execute("return document.body.scrollHeight", vec![])
            .await
            .map_err(session_error)?;
        Ok(height.as_u64().unwrap_or(0))
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), HarvestError> {
        self.client
            .execute("window.scrollTo(0, document.body.scrollHeight);", vec![])
            .await
            .map_err(session_error)?;
        Ok(())
    }

    async fn quit(&mut self) -> Result<(), HarvestError> {
        info!("Closing webdriver session");
        self.client.clone().close().await.map_err(session_error)
    }
}

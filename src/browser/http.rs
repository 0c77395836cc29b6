use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, warn};

use super::{random_user_agent, Browser};
use crate::config::SiteConfig;
use crate::error::HarvestError;
use crate::parsers::contains_element;

/// Fetches pages over plain HTTP. No script runs, so the fetched
/// markup is the rendered page and scrolling never changes it.
pub struct HttpBrowser {
    client: Client,
    timeout: Duration,
    source: String,
}

pub fn create_client(site: &SiteConfig) -> Result<Client, HarvestError> {
    let client = ClientBuilder::new()
        .user_agent(random_user_agent(&site.user_agents))
        .timeout(Duration::from_secs(site.request_timeout_secs))
        .cookie_store(true)
        .build()?;

    Ok(client)
}

impl HttpBrowser {
    pub fn new(site: &SiteConfig) -> Result<Self, HarvestError> {
        Ok(Self::with_client(
            create_client(site)?,
            Duration::from_secs(site.request_timeout_secs),
        ))
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            source: String::new(),
        }
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn navigate(&mut self, url: &str) -> Result<(), HarvestError> {
        debug!("GET {}", url);
        self.source.clear();

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Err(HarvestError::timeout(url, self.timeout)),
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP error {}: {}", status, url);
            return Err(HarvestError::Navigation {
                url: url.to_string(),
                reason: format!("HTTP status {}", status),
            });
        }

        self.source = response.text().await?;
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), HarvestError> {
        if contains_element(&self.source, selector)? {
            Ok(())
        } else {
            Err(HarvestError::timeout(selector, timeout))
        }
    }

    async fn page_source(&mut self) -> Result<String, HarvestError> {
        Ok(self.source.clone())
    }

    async fn scroll_height(&mut self) -> Result<u64, HarvestError> {
        Ok(self.source.len() as u64)
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), HarvestError> {
        Ok(())
    }

    async fn quit(&mut self) -> Result<(), HarvestError> {
        self.source.clear();
        Ok(())
    }
}

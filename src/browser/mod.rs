use async_trait::async_trait;
use rand::{rng, Rng};
use std::time::Duration;

use crate::error::HarvestError;

mod fixture;
mod http;
#[cfg(feature = "webdriver")]
mod webdriver;

pub use fixture::{StaticBrowser, StaticBrowserLog};
pub use http::HttpBrowser;
#[cfg(feature = "webdriver")]
pub use webdriver::WebDriverBrowser;

/// The browsing capabilities the harvester needs from a session.
///
/// DOM queries run on the returned page source (see [`crate::parsers::Page`]).
#[async_trait]
pub trait Browser: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), HarvestError>;

    /// Wait until an element matching `selector` is present.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), HarvestError>;

    async fn page_source(&mut self) -> Result<String, HarvestError>;

    async fn scroll_height(&mut self) -> Result<u64, HarvestError>;

    async fn scroll_to_bottom(&mut self) -> Result<(), HarvestError>;

    /// Tear the session down. Called once, at the end of a run.
    async fn quit(&mut self) -> Result<(), HarvestError>;
}

pub const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

pub fn random_user_agent(user_agents: &[String]) -> String {
    if user_agents.is_empty() {
        return FALLBACK_USER_AGENT.to_string();
    }
    let i = rng().random_range(0..user_agents.len());
    user_agents[i].clone()
}

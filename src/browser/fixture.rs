use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::Browser;
use crate::error::HarvestError;
use crate::parsers::contains_element;

/// Serves canned HTML by URL. Unknown URLs render an empty document,
/// so waits on them time out the way a live page without the element would.
pub struct StaticBrowser {
    pages: HashMap<String, String>,
    source: String,
    log: StaticBrowserLog,
}

/// Shared record of what a [`StaticBrowser`] was asked to do.
#[derive(Clone, Default)]
pub struct StaticBrowserLog {
    inner: Arc<Mutex<LogState>>,
}

#[derive(Default)]
struct LogState {
    visited: Vec<String>,
    quit_calls: usize,
}

impl StaticBrowserLog {
    fn state(&self) -> MutexGuard<'_, LogState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn visited(&self) -> Vec<String> {
        self.state().visited.clone()
    }

    pub fn quit_calls(&self) -> usize {
        self.state().quit_calls
    }
}

impl StaticBrowser {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            source: String::new(),
            log: StaticBrowserLog::default(),
        }
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    pub fn log(&self) -> StaticBrowserLog {
        self.log.clone()
    }
}

impl Default for StaticBrowser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Browser for StaticBrowser {
    async fn navigate(&mut self, url: &str) -> Result<(), HarvestError> {
        self.log.state().visited.push(url.to_string());
        self.source = self
            .pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| "<html><body></body></html>".to_string());
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
        self.log.state().quit_calls += 1;
        Ok(())
    }
}

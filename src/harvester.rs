use rand::{rng, Rng};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::browser::Browser;
use crate::config::{CategoryConfig, Config};
use crate::error::HarvestError;
use crate::models::{ProductId, ProductRecord};
use crate::parsers::{
    extract_product_ids, parse_product_page, parse_reviews_page, PRODUCT_TITLE_SELECTOR,
    RESULTS_SELECTOR, REVIEW_SELECTOR,
};

/// What a harvest run produced, plus its failure counts.
#[derive(Debug, Default)]
pub struct HarvestReport {
    pub records: Vec<ProductRecord>,
    pub pages_visited: usize,
    pub pages_skipped: usize,
    pub products_failed: usize,
}

/// Walks the configured categories with a single browser session.
pub struct Harvester {
    config: Config,
    browser: Box<dyn Browser>,
    seen: HashSet<ProductId>,
}

impl Harvester {
    pub fn new(config: Config, browser: Box<dyn Browser>) -> Self {
        Self {
            config,
            browser,
            seen: HashSet::new(),
        }
    }

    /// Harvest every category, then quit the browser exactly once.
    pub async fn run(mut self) -> HarvestReport {
        let mut report = HarvestReport::default();
        let categories = self.config.categories.clone();

        for category in &categories {
            info!("Processing category: {}", category.name);
            self.harvest_category(category, &mut report).await;
        }

        if let Err(e) = self.browser.quit().await {
            error!("Failed to shut down browser session: {}", e);
        }

        info!(
            "Harvest finished: {} products, {} pages visited, {} pages skipped, {} products failed",
            report.records.len(),
            report.pages_visited,
            report.pages_skipped,
            report.products_failed
        );
        report
    }

    async fn harvest_category(&mut self, category: &CategoryConfig, report: &mut HarvestReport) {
        for page in 1..=self.config.harvest.max_pages {
            let url = match search_page_url(&category.search_url, page) {
                Ok(url) => url,
                Err(e) => {
                    error!("Skipping category {}: {}", category.name, e);
                    return;
                }
            };

            let html = match self.load_search_page(&url).await {
                Ok(html) => html,
                Err(e) if e.is_timeout() => {
                    warn!("Timed out waiting for page {} of category {}", page, category.name);
                    report.pages_skipped += 1;
                    continue;
                }
                Err(e) => {
                    error!("Failed to load page {} of category {}: {}", page, category.name, e);
                    report.pages_skipped += 1;
                    continue;
                }
            };
            report.pages_visited += 1;

            let ids = extract_product_ids(&html);
            info!("Extracted {} product ids from page {} of {}", ids.len(), page, category.name);

            for id in ids {
                if self.seen.contains(&id) {
                    debug!("Already processed {}", id);
                    continue;
                }

                info!("Processing product: {}", id);
                match self.harvest_product(&id, &category.name).await {
                    Ok(record) => {
                        self.seen.insert(id);
                        report.records.push(record);
                    }
                    Err(e) => {
                        error!("Error processing product {}: {}", id, e);
                        report.products_failed += 1;
                    }
                }
            }
        }
    }

    async fn load_search_page(&mut self, url: &str) -> Result<String, HarvestError> {
        let harvest = &self.config.harvest;
        let search_timeout = harvest.search_timeout();
        let (pause_min, pause_max) = (harvest.page_pause_min_secs, harvest.page_pause_max_secs);

        self.browser.navigate(url).await?;
        self.scroll_until_stable().await?;
        self.browser.wait_for(RESULTS_SELECTOR, search_timeout).await?;

        pause(pause_min, pause_max).await;
        self.browser.page_source().await
    }

    /// Scroll to the bottom until the page height stops growing.
    async fn scroll_until_stable(&mut self) -> Result<(), HarvestError> {
        let harvest = &self.config.harvest;
        let (pause_min, pause_max) = (harvest.scroll_pause_min_secs, harvest.scroll_pause_max_secs);
        let max_rounds = harvest.max_scroll_rounds;

        let mut last_height = self.browser.scroll_height().await?;
        for _ in 0..max_rounds {
            self.browser.scroll_to_bottom().await?;
            pause(pause_min, pause_max).await;

            let new_height = self.browser.scroll_height().await?;
            if new_height == last_height {
                return Ok(());
            }
            last_height = new_height;
        }

        debug!("Page height still changing after {} scroll rounds", max_rounds);
        Ok(())
    }

    async fn harvest_product(&mut self, id: &ProductId, category: &str) -> Result<ProductRecord, HarvestError> {
        let base_url = self.config.site.base_url.clone();
        let harvest = self.config.harvest.clone();

        let reviews_url = reviews_page_url(&base_url, id)?;
        let mut record = ProductRecord::new(id.clone(), category, reviews_url.clone());

        self.browser.navigate(&product_page_url(&base_url, id)?).await?;
        self.browser
            .wait_for(PRODUCT_TITLE_SELECTOR, harvest.product_timeout())
            .await?;
        let product_html = self.browser.page_source().await?;
        parse_product_page(&product_html).apply_to(&mut record);

        self.browser.navigate(&reviews_url).await?;
        match self.browser.wait_for(REVIEW_SELECTOR, harvest.review_timeout()).await {
            Ok(()) => {
                let reviews_html = self.browser.page_source().await?;
                parse_reviews_page(&reviews_html, harvest.max_general_reviews).apply_to(&mut record);
            }
            Err(e) if e.is_timeout() => {
                warn!("Could not find reviews for {}", reviews_url);
            }
            Err(e) => return Err(e),
        }

        Ok(record)
    }
}

async fn pause(min_secs: f64, max_secs: f64) {
    if max_secs <= 0.0 {
        return;
    }
    let secs = if max_secs > min_secs {
        rng().random_range(min_secs.max(0.0)..=max_secs)
    } else {
        max_secs
    };
    tokio::time::sleep(Duration::from_secs_f64(secs)).await;
}

/// The search URL with a `page=<n>` query pair appended.
pub fn search_page_url(search_url: &str, page: u32) -> Result<String, HarvestError> {
    let mut url = parse_url(search_url)?;
    url.query_pairs_mut().append_pair("page", &page.to_string());
    Ok(url.to_string())
}

pub fn product_page_url(base_url: &str, id: &ProductId) -> Result<String, HarvestError> {
    let url = parse_url(base_url)?;
    let joined = url
        .join(&format!("/dp/{}", id.0))
        .map_err(|source| HarvestError::Url {
            url: base_url.to_string(),
            source,
        })?;
    Ok(joined.to_string())
}

/// All-reviewers, most-recent-first review listing for a product.
pub fn reviews_page_url(base_url: &str, id: &ProductId) -> Result<String, HarvestError> {
    let url = parse_url(base_url)?;
    let mut joined = url
        .join(&format!("/product-reviews/{}/ref=cm_cr_dp_d_show_all_top", id.0))
        .map_err(|source| HarvestError::Url {
            url: base_url.to_string(),
            source,
        })?;

    let query = serde_urlencoded::to_string([
        ("ie", "UTF8"),
        ("reviewerType", "all_reviews"),
        ("sortBy", "recent"),
    ])
    .map_err(|e| HarvestError::Navigation {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    joined.set_query(Some(&query));
    Ok(joined.to_string())
}

fn parse_url(raw: &str) -> Result<Url, HarvestError> {
    Url::parse(raw).map_err(|source| HarvestError::Url {
        url: raw.to_string(),
        source,
    })
}

/// Write the records as one JSON array, replacing `path` only once fully written.
pub fn write_json_atomically(path: &Path, records: &[ProductRecord]) -> Result<(), HarvestError> {
    let bytes = serde_json::to_vec(records)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    std::fs::write(tmp, bytes)?;
    std::fs::rename(tmp, path)?;
    Ok(())
}

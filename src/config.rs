use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Optional settings file read from the working directory.
pub const CONFIG_FILE: &str = "review_harvest";

/// Environment variable prefix, e.g. `HARVEST_HARVEST__MAX_PAGES=3`.
pub const ENV_PREFIX: &str = "HARVEST";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Search categories, harvested in order.
    pub categories: Vec<CategoryConfig>,
    pub site: SiteConfig,
    pub harvest: HarvestConfig,
    pub output: OutputConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub search_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub base_url: String,
    /// WebDriver endpoint, only used with the `webdriver` feature.
    pub webdriver_url: String,
    pub user_agents: Vec<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    pub max_pages: u32,
    pub max_general_reviews: usize,
    pub search_timeout_secs: u64,
    pub product_timeout_secs: u64,
    pub review_timeout_secs: u64,
    pub scroll_pause_min_secs: f64,
    pub scroll_pause_max_secs: f64,
    pub max_scroll_rounds: u32,
    pub page_pause_min_secs: f64,
    pub page_pause_max_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub json_path: String,
    pub csv_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub table: String,
}

impl Default for Config {
    fn default() -> Self {
        let categories = [
            ("Smartphones", "https://www.amazon.com/s?k=smartphone&ref=nb_sb_noss"),
            ("Laptops", "https://www.amazon.com/s?k=Laptops&ref=nb_sb_noss"),
            ("video_games", "https://www.amazon.com/s?k=video_games&ref=nb_sb_noss"),
            ("Dresses", "https://www.amazon.com/s?k=Dresses&ref=nb_sb_noss"),
            ("Shoes", "https://www.amazon.com/s?k=Shoes&ref=nb_sb_noss"),
            ("Accessories", "https://www.amazon.com/s?k=accessories+for+clothes&ref=nb_sb_noss"),
        ]
        .into_iter()
        .map(|(name, url)| CategoryConfig {
            name: name.to_string(),
            search_url: url.to_string(),
        })
        .collect();

        Config {
            categories,
            site: SiteConfig {
                base_url: "https://www.amazon.com".to_string(),
                webdriver_url: "http://localhost:4444".to_string(),
                user_agents: vec![
                    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537".to_string(),
                    "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:54.0) Gecko/20100101 Firefox/54.0".to_string(),
                    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.113 Safari/537.36".to_string(),
                    "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/64.0.3282.140 Safari/537.36 Edge/17.17134".to_string(),
                ],
                request_timeout_secs: 25,
            },
            harvest: HarvestConfig {
                max_pages: 19,
                max_general_reviews: 5,
                search_timeout_secs: 25,
                product_timeout_secs: 20,
                review_timeout_secs: 20,
                scroll_pause_min_secs: 2.0,
                scroll_pause_max_secs: 4.0,
                max_scroll_rounds: 30,
                page_pause_min_secs: 3.0,
                page_pause_max_secs: 6.0,
            },
            output: OutputConfig {
                json_path: "amazon_data_ext.json".to_string(),
                csv_path: "amazon_data_ext.csv".to_string(),
            },
            database: DatabaseConfig {
                path: "amazon_data_ext.db".to_string(),
                table: "amazon_data_ext".to_string(),
            },
        }
    }
}

impl Config {
    /// Built-in defaults, overlaid by `review_harvest.toml` and `HARVEST_*` variables.
    pub fn load() -> Result<Self> {
        let defaults = config::Config::try_from(&Config::default())
            .context("Failed to build default configuration")?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to assemble configuration")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl HarvestConfig {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn product_timeout(&self) -> Duration {
        Duration::from_secs(self.product_timeout_secs)
    }

    pub fn review_timeout(&self) -> Duration {
        Duration::from_secs(self.review_timeout_secs)
    }

    /// Zero every pacing interval; used against static pages.
    pub fn without_pacing(mut self) -> Self {
        self.scroll_pause_min_secs = 0.0;
        self.scroll_pause_max_secs = 0.0;
        self.page_pause_min_secs = 0.0;
        self.page_pause_max_secs = 0.0;
        self
    }
}

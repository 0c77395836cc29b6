//! Harvests product listings and reviews, then normalizes them into a
//! relational table and a CSV export.

pub mod browser;
pub mod config;
pub mod error;
pub mod export;
pub mod harvester;
pub mod loader;
pub mod logging;
pub mod models;
pub mod normalizer;
pub mod parsers;
pub mod storage;

pub use config::Config;
pub use error::{HarvestError, LoadError};

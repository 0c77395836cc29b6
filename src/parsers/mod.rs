pub mod counts;
pub mod dates;
pub mod listing;
pub mod price;
pub mod product_page;
pub mod reviews;

pub use counts::*;
pub use dates::*;
pub use listing::*;
pub use price::*;
pub use product_page::*;
pub use reviews::*;

use html_escape::decode_html_entities;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::HarvestError;

/// Clean and normalize text by removing extra whitespace and decoding HTML entities
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(text);
    decoded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Parse a CSS selector, logging and discarding invalid ones.
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            debug!("Invalid selector `{}`: {:?}", css, e);
            None
        }
    }
}

/// Whitespace-normalized text content of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Text of the first descendant of `element` matching `css`.
pub fn select_text(element: ElementRef<'_>, css: &str) -> Option<String> {
    let selector = selector(css)?;
    element.select(&selector).next().map(element_text)
}

/// A parsed snapshot of a rendered page.
pub struct Page {
    document: Html,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn query_all(&self, css: &str) -> Vec<ElementRef<'_>> {
        match selector(css) {
            Some(selector) => self.document.select(&selector).collect(),
            None => Vec::new(),
        }
    }

    pub fn query_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = selector(css)?;
        self.document.select(&selector).next()
    }

    /// Text of the first element matching `css`, `None` when nothing matches.
    pub fn query_text(&self, css: &str) -> Option<String> {
        self.query_first(css).map(element_text)
    }
}

/// Whether `html` contains an element matching `css`.
pub fn contains_element(html: &str, css: &str) -> Result<bool, HarvestError> {
    let selector = Selector::parse(css).map_err(|_| HarvestError::Selector(css.to_string()))?;
    let document = Html::parse_document(html);
    let found = document.select(&selector).next().is_some();
    Ok(found)
}

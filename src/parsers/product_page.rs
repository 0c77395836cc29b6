use super::{element_text, extract_price, parse_review_count, Page};
use crate::models::ProductRecord;

/// Present once the product detail page has rendered.
pub const PRODUCT_TITLE_SELECTOR: &str = "#productTitle";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDetails {
    pub title: String,
    pub price: String,
    pub rating: String,
    pub review_count: u64,
}

impl ProductDetails {
    pub fn apply_to(self, record: &mut ProductRecord) {
        record.title = self.title;
        record.price = self.price;
        record.rating = self.rating;
        record.review_count = self.review_count;
    }
}

/// Extract the detail fields; every missing piece falls back to its default.
pub fn parse_product_page(html: &str) -> ProductDetails {
    let page = Page::parse(html);

    ProductDetails {
        title: get_title(&page),
        price: get_price(&page),
        rating: get_rating(&page),
        review_count: get_review_count(&page),
    }
}

fn get_title(page: &Page) -> String {
    page.query_text("span#productTitle").unwrap_or_default()
}

fn get_price(page: &Page) -> String {
    page.query_first("span.aok-offscreen")
        .or_else(|| page.query_first("span.a-offscreen"))
        .map(element_text)
        .and_then(|text| extract_price(&text))
        .unwrap_or_default()
}

fn get_rating(page: &Page) -> String {
    page.query_text("#acrPopover > span.a-declarative > a > span")
        .unwrap_or_default()
}

fn get_review_count(page: &Page) -> u64 {
    page.query_text("#acrCustomerReviewText")
        .and_then(|text| parse_review_count(&text))
        .unwrap_or(0)
}

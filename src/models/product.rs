use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

use super::columns::{self, featured, featured_column, general, general_column};
use super::{FeaturedKind, FeaturedReview, GeneralReview};

// NewType pattern for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One harvested product, serialized as a flat JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub id: ProductId,
    pub title: String,
    /// Digits captured from the price span, empty when absent.
    pub price: String,
    /// Rating text as displayed, empty when absent.
    pub rating: String,
    pub review_count: u64,
    pub category: String,
    pub url: String,
    pub top_positive: FeaturedReview,
    pub critical: FeaturedReview,
    pub general: Vec<GeneralReview>,
}

impl ProductRecord {
    pub fn new(id: ProductId, category: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            title: String::new(),
            price: String::new(),
            rating: String::new(),
            review_count: 0,
            category: category.into(),
            url: url.into(),
            top_positive: FeaturedReview::default(),
            critical: FeaturedReview::default(),
            general: Vec::new(),
        }
    }

    pub fn featured(&self, kind: FeaturedKind) -> &FeaturedReview {
        match kind {
            FeaturedKind::TopPositive => &self.top_positive,
            FeaturedKind::Critical => &self.critical,
        }
    }
}

/// Dates travel through the JSON file as midnight timestamps.
pub fn iso_timestamp(date: NaiveDate) -> String {
    format!("{}T00:00:00", date.format("%Y-%m-%d"))
}

impl Serialize for ProductRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(columns::PRODUCT_ID, &self.id.0)?;
        map.serialize_entry(columns::TITLE, &self.title)?;
        map.serialize_entry(columns::PRICE, &self.price)?;
        map.serialize_entry(columns::RATINGS, &self.rating)?;
        map.serialize_entry(columns::REVIEWS, &self.review_count)?;
        map.serialize_entry(columns::CATEGORY, &self.category)?;
        map.serialize_entry(columns::URL, &self.url)?;

        for kind in FeaturedKind::ALL {
            let review = self.featured(kind);
            map.serialize_entry(&featured_column(kind, featured::ID), &review.customer_id)?;
            map.serialize_entry(&featured_column(kind, featured::NAME), &review.customer_name)?;
            map.serialize_entry(
                &featured_column(kind, featured::DATE),
                &review.date.map(iso_timestamp),
            )?;
            map.serialize_entry(&featured_column(kind, featured::COMMENT), &review.comment)?;
            map.serialize_entry(
                &featured_column(kind, featured::COMMENT_TITLE),
                &review.comment_title,
            )?;
            map.serialize_entry(&featured_column(kind, featured::INFLUENCED), &review.influenced)?;
            map.serialize_entry(&featured_column(kind, featured::STAR_RATING), &review.star_rating)?;
        }

        // Slots without a review on the page are left out entirely
        for (index, review) in self.general.iter().take(general::SLOTS).enumerate() {
            let slot = index + 1;
            map.serialize_entry(&general_column(slot, general::ID), &review.customer_id)?;
            map.serialize_entry(&general_column(slot, general::STAR_RATING), &review.star_rating)?;
            map.serialize_entry(&general_column(slot, general::COMMENT), &review.comment)?;
            map.serialize_entry(
                &general_column(slot, general::BUYING_INFLUENCE),
                &review.buying_influence,
            )?;
            map.serialize_entry(&general_column(slot, general::DATE), &review.date.map(iso_timestamp))?;
        }

        map.end()
    }
}

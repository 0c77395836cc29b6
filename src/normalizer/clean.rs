use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use tracing::debug;

use super::raw::RawRecord;
use super::value::ColumnValue;
use crate::models::{
    featured, featured_column, general, general_column, FeaturedKind, ProductId, CATEGORY, COLUMNS,
    PRICE, RATINGS, REVIEWS, TITLE, URL,
};
use crate::parsers::{parse_price_amount, parse_review_count};

/// Substituted for missing reviewer text fields.
pub const UNAVAILABLE: &str = "Unavailable";

/// Substituted for missing or unparseable dates.
pub const DATE_SENTINEL: &str = "1677-09-21";

static SENTINEL_DATE: Lazy<NaiveDate> = Lazy::new(|| {
    NaiveDate::parse_from_str(DATE_SENTINEL, "%Y-%m-%d")
        .expect("Invalid sentinel date")
});

pub fn sentinel_date() -> NaiveDate {
    *SENTINEL_DATE
}

pub fn text_or_unavailable(value: Option<String>) -> String {
    value.unwrap_or_else(|| UNAVAILABLE.to_string())
}

/// Non-negative whole count; fractional input (`"3.0"`) is truncated.
pub fn count_or_zero(value: Option<String>) -> i64 {
    let Some(text) = value else { return 0 };
    let text = text.trim();

    if let Ok(count) = text.parse::<i64>() {
        return count.max(0);
    }
    match text.parse::<f64>() {
        Ok(count) if count.is_finite() && count >= 0.0 => count.trunc() as i64,
        _ => {
            debug!("Unparseable count {:?}", text);
            0
        }
    }
}

/// `"2023-03-01T00:00:00"` or `"2023-03-01"` to a date, else the sentinel.
pub fn date_or_sentinel(value: Option<String>) -> NaiveDate {
    let Some(text) = value else {
        return sentinel_date();
    };
    let text = text.trim();

    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|timestamp| timestamp.date())
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .unwrap_or_else(|_| {
            debug!("Unparseable date {:?}, using {}", text, DATE_SENTINEL);
            sentinel_date()
        })
}

pub fn price_or_zero(value: Option<String>) -> f64 {
    value
        .and_then(|text| parse_price_amount(&text))
        .unwrap_or(0.0)
}

/// Leading number of a rating text such as `"4.5"` or `"4.5 out of 5 stars"`.
pub fn rating_or_zero(value: Option<String>) -> f64 {
    value
        .as_deref()
        .and_then(|text| text.split_whitespace().next())
        .and_then(|token| token.parse::<f64>().ok())
        .filter(|rating| rating.is_finite() && *rating >= 0.0)
        .unwrap_or(0.0)
}

pub fn review_count_or_zero(value: Option<String>) -> i64 {
    value
        .and_then(|text| parse_review_count(&text))
        .and_then(|count| i64::try_from(count).ok())
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanFeatured {
    pub customer_id: String,
    pub customer_name: String,
    pub date: NaiveDate,
    pub comment: String,
    pub comment_title: String,
    pub influenced: i64,
    pub star_rating: f64,
}

impl Default for CleanFeatured {
    fn default() -> Self {
        Self {
            customer_id: UNAVAILABLE.to_string(),
            customer_name: UNAVAILABLE.to_string(),
            date: sentinel_date(),
            comment: UNAVAILABLE.to_string(),
            comment_title: UNAVAILABLE.to_string(),
            influenced: 0,
            star_rating: 0.0,
        }
    }
}

impl CleanFeatured {
    pub fn from_raw(raw: &RawRecord, kind: FeaturedKind) -> Self {
        let column = |field: &str| raw.text(&featured_column(kind, field));

        Self {
            customer_id: text_or_unavailable(column(featured::ID)),
            customer_name: text_or_unavailable(column(featured::NAME)),
            date: date_or_sentinel(column(featured::DATE)),
            comment: text_or_unavailable(column(featured::COMMENT)),
            comment_title: text_or_unavailable(column(featured::COMMENT_TITLE)),
            influenced: count_or_zero(column(featured::INFLUENCED)),
            star_rating: rating_or_zero(column(featured::STAR_RATING)),
        }
    }

    fn push_values(&self, row: &mut Vec<ColumnValue>) {
        row.push(self.customer_id.clone().into());
        row.push(self.customer_name.clone().into());
        row.push(self.date.into());
        row.push(self.comment.clone().into());
        row.push(self.comment_title.clone().into());
        row.push(self.influenced.into());
        row.push(self.star_rating.into());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanGeneral {
    pub customer_id: String,
    pub star_rating: f64,
    pub comment: String,
    pub buying_influence: i64,
    pub date: NaiveDate,
}

impl Default for CleanGeneral {
    fn default() -> Self {
        Self {
            customer_id: UNAVAILABLE.to_string(),
            star_rating: 0.0,
            comment: UNAVAILABLE.to_string(),
            buying_influence: 0,
            date: sentinel_date(),
        }
    }
}

impl CleanGeneral {
    /// `slot` is 1-based.
    pub fn from_raw(raw: &RawRecord, slot: usize) -> Self {
        let column = |field: &str| raw.text(&general_column(slot, field));

        Self {
            customer_id: text_or_unavailable(column(general::ID)),
            star_rating: rating_or_zero(column(general::STAR_RATING)),
            comment: text_or_unavailable(column(general::COMMENT)),
            buying_influence: count_or_zero(column(general::BUYING_INFLUENCE)),
            date: date_or_sentinel(column(general::DATE)),
        }
    }

    fn push_values(&self, row: &mut Vec<ColumnValue>) {
        row.push(self.customer_id.clone().into());
        row.push(self.star_rating.into());
        row.push(self.comment.clone().into());
        row.push(self.buying_influence.into());
        row.push(self.date.into());
    }
}

/// A product ready for the destination table. Build with [`CleanProductBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct CleanProduct {
    pub product_id: ProductId,
    pub product: String,
    pub price: f64,
    pub ratings: f64,
    pub reviews: i64,
    pub category: String,
    pub url: String,
    pub top_positive: CleanFeatured,
    pub critical: CleanFeatured,
    pub general: [CleanGeneral; general::SLOTS],
}

impl CleanProduct {
    pub fn builder(product_id: ProductId) -> CleanProductBuilder {
        CleanProductBuilder::new(product_id)
    }

    /// Clean a raw record; `None` when it has no product id.
    pub fn from_raw(raw: &RawRecord) -> Option<Self> {
        let product_id = raw.product_id()?;

        let mut builder = CleanProduct::builder(product_id)
            .product(raw.text(TITLE).unwrap_or_default())
            .price(price_or_zero(raw.text(PRICE)))
            .ratings(rating_or_zero(raw.text(RATINGS)))
            .reviews(review_count_or_zero(raw.text(REVIEWS)))
            .category(raw.text(CATEGORY).unwrap_or_default())
            .url(raw.text(URL).unwrap_or_default());

        for kind in FeaturedKind::ALL {
            builder = builder.featured(kind, CleanFeatured::from_raw(raw, kind));
        }
        for slot in 1..=general::SLOTS {
            builder = builder.general(slot, CleanGeneral::from_raw(raw, slot));
        }

        Some(builder.build())
    }

    pub fn featured(&self, kind: FeaturedKind) -> &CleanFeatured {
        match kind {
            FeaturedKind::TopPositive => &self.top_positive,
            FeaturedKind::Critical => &self.critical,
        }
    }

    /// Values in destination column order.
    pub fn to_row(&self) -> Vec<ColumnValue> {
        let mut row = Vec::with_capacity(COLUMNS.len());
        row.push(self.product_id.0.clone().into());
        row.push(self.product.clone().into());
        row.push(self.price.into());
        row.push(self.ratings.into());
        row.push(self.reviews.into());
        row.push(self.category.clone().into());
        row.push(self.url.clone().into());

        for kind in FeaturedKind::ALL {
            self.featured(kind).push_values(&mut row);
        }
        for review in &self.general {
            review.push_values(&mut row);
        }
        row
    }
}

/// Starts every column at its sentinel, so a built product is always complete.
#[derive(Debug, Clone)]
pub struct CleanProductBuilder {
    product: CleanProduct,
}

impl CleanProductBuilder {
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product: CleanProduct {
                product_id,
                product: String::new(),
                price: 0.0,
                ratings: 0.0,
                reviews: 0,
                category: String::new(),
                url: String::new(),
                top_positive: CleanFeatured::default(),
                critical: CleanFeatured::default(),
                general: Default::default(),
            },
        }
    }

    pub fn product(mut self, title: impl Into<String>) -> Self {
        self.product.product = title.into();
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.product.price = price;
        self
    }

    pub fn ratings(mut self, ratings: f64) -> Self {
        self.product.ratings = ratings;
        self
    }

    pub fn reviews(mut self, reviews: i64) -> Self {
        self.product.reviews = reviews;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.product.category = category.into();
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.product.url = url.into();
        self
    }

    pub fn featured(mut self, kind: FeaturedKind, review: CleanFeatured) -> Self {
        match kind {
            FeaturedKind::TopPositive => self.product.top_positive = review,
            FeaturedKind::Critical => self.product.critical = review,
        }
        self
    }

    /// `slot` is 1-based; out-of-range slots are ignored.
    pub fn general(mut self, slot: usize, review: CleanGeneral) -> Self {
        if let Some(target) = slot.checked_sub(1).and_then(|i| self.product.general.get_mut(i)) {
            *target = review;
        }
        self
    }

    pub fn build(self) -> CleanProduct {
        self.product
    }
}

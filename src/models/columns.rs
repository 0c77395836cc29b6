use once_cell::sync::Lazy;

use super::FeaturedKind;

pub const PRODUCT_ID: &str = "Product_ID";
pub const TITLE: &str = "product";
pub const PRICE: &str = "price";
pub const RATINGS: &str = "ratings";
pub const REVIEWS: &str = "reviews";
pub const CATEGORY: &str = "category";
pub const URL: &str = "url";

pub const PRODUCT_COLUMNS: [&str; 7] = [PRODUCT_ID, TITLE, PRICE, RATINGS, REVIEWS, CATEGORY, URL];

/// Per-field suffixes of the featured review columns.
pub mod featured {
    pub const ID: &str = "ID";
    pub const NAME: &str = "Name";
    pub const DATE: &str = "Date";
    pub const COMMENT: &str = "Comment";
    pub const COMMENT_TITLE: &str = "Comment_Title";
    pub const INFLUENCED: &str = "Influenced";
    pub const STAR_RATING: &str = "Star_Rating";

    pub const FIELDS: [&str; 7] = [ID, NAME, DATE, COMMENT, COMMENT_TITLE, INFLUENCED, STAR_RATING];
}

/// Per-field suffixes of the general review columns.
pub mod general {
    pub const ID: &str = "ID";
    pub const STAR_RATING: &str = "Star_Rating";
    pub const COMMENT: &str = "Comment";
    pub const BUYING_INFLUENCE: &str = "buying_influence";
    pub const DATE: &str = "Date";

    pub const FIELDS: [&str; 5] = [ID, STAR_RATING, COMMENT, BUYING_INFLUENCE, DATE];

    /// Number of general review slots per product.
    pub const SLOTS: usize = 5;
}

pub const COLUMN_COUNT: usize = PRODUCT_COLUMNS.len()
    + FeaturedKind::ALL.len() * featured::FIELDS.len()
    + general::SLOTS * general::FIELDS.len();

pub fn featured_column(kind: FeaturedKind, field: &str) -> String {
    format!("{}_Review_Cust_{}", kind.prefix(), field)
}

/// `slot` is 1-based, matching the column names.
pub fn general_column(slot: usize, field: &str) -> String {
    format!("Customer_{}_{}", slot, field)
}

/// Destination table columns in insert order.
pub static COLUMNS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut columns: Vec<String> = PRODUCT_COLUMNS.iter().map(|c| c.to_string()).collect();
    for kind in FeaturedKind::ALL {
        columns.extend(featured::FIELDS.iter().map(|f| featured_column(kind, f)));
    }
    for slot in 1..=general::SLOTS {
        columns.extend(general::FIELDS.iter().map(|f| general_column(slot, f)));
    }
    columns
});

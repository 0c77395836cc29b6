use chrono::NaiveDate;

use super::{MISSING_COMMENT, MISSING_TEXT};

/// The two featured reviews surfaced apart from the general list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeaturedKind {
    TopPositive,
    Critical,
}

impl FeaturedKind {
    pub const ALL: [FeaturedKind; 2] = [FeaturedKind::TopPositive, FeaturedKind::Critical];

    /// Column name prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            FeaturedKind::TopPositive => "Top_Positive",
            FeaturedKind::Critical => "Critical",
        }
    }

    /// Class on the review column that holds this review's vote count.
    pub fn marker_class(&self) -> &'static str {
        match self {
            FeaturedKind::TopPositive => "positive-review",
            FeaturedKind::Critical => "critical-review",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedReview {
    pub customer_id: String,
    pub customer_name: String,
    pub comment: String,
    pub comment_title: String,
    pub influenced: u64,
    pub star_rating: f64,
    pub date: Option<NaiveDate>,
}

impl Default for FeaturedReview {
    fn default() -> Self {
        Self {
            customer_id: MISSING_TEXT.to_string(),
            customer_name: MISSING_TEXT.to_string(),
            comment: MISSING_TEXT.to_string(),
            comment_title: MISSING_TEXT.to_string(),
            influenced: 0,
            star_rating: 0.0,
            date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneralReview {
    pub customer_id: String,
    pub star_rating: f64,
    pub comment: String,
    pub buying_influence: u64,
    pub date: Option<NaiveDate>,
}

impl Default for GeneralReview {
    fn default() -> Self {
        Self {
            customer_id: MISSING_TEXT.to_string(),
            star_rating: 0.0,
            comment: MISSING_COMMENT.to_string(),
            buying_influence: 0,
            date: None,
        }
    }
}

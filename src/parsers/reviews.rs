use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use tracing::debug;

use super::{parse_helpful_votes, parse_review_date, select_text, Page};
use crate::models::{FeaturedKind, FeaturedReview, GeneralReview, ProductRecord, MISSING_COMMENT, MISSING_TEXT};

/// Present once the review list has rendered.
pub const REVIEW_SELECTOR: &str = "div[data-hook='review']";

const FEATURED_SELECTOR: &str = "div[id^='viewpoint-']";

static STAR_SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(\.\d+)? out of 5 stars\s*")
        .expect("Invalid star suffix regex")
});

/// Reviews extracted from a product's review page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewsPage {
    pub general: Vec<GeneralReview>,
    pub top_positive: FeaturedReview,
    pub critical: FeaturedReview,
}

impl ReviewsPage {
    pub fn apply_to(self, record: &mut ProductRecord) {
        record.general = self.general;
        record.top_positive = self.top_positive;
        record.critical = self.critical;
    }
}

pub fn parse_reviews_page(html: &str, max_general: usize) -> ReviewsPage {
    let page = Page::parse(html);

    let general = page
        .query_all(REVIEW_SELECTOR)
        .into_iter()
        .take(max_general)
        .map(parse_general_review)
        .collect();

    let markers = page.query_all(FEATURED_SELECTOR);
    let featured = |index: usize, kind: FeaturedKind| {
        markers
            .get(index)
            .map(|marker| parse_featured_review(&page, *marker, kind))
            .unwrap_or_default()
    };

    ReviewsPage {
        general,
        top_positive: featured(0, FeaturedKind::TopPositive),
        critical: featured(1, FeaturedKind::Critical),
    }
}

fn parse_general_review(review: ElementRef<'_>) -> GeneralReview {
    let customer_id = review
        .value()
        .attr("id")
        .map(str::to_string)
        .unwrap_or_else(|| MISSING_TEXT.to_string());

    let star_rating = select_text(review, "i[data-hook='review-star-rating'] span.a-icon-alt")
        .and_then(|text| parse_star_rating(&text))
        .unwrap_or(0.0);

    let comment = select_text(review, "a[data-hook='review-title']")
        .or_else(|| select_text(review, "span.cr-original-review-content"))
        .map(|text| strip_star_suffix(&text))
        .unwrap_or_else(|| MISSING_COMMENT.to_string());

    let buying_influence = select_text(review, "span[data-hook='helpful-vote-statement']")
        .and_then(|text| parse_helpful_votes(&text))
        .unwrap_or(0);

    let date = select_text(review, &format!("#customer_review-{} > span", customer_id))
        .and_then(|text| parse_review_date(&text));
    if date.is_none() {
        debug!("No usable post date for review {}", customer_id);
    }

    GeneralReview {
        customer_id,
        star_rating,
        comment,
        buying_influence,
        date,
    }
}

fn parse_featured_review(page: &Page, marker: ElementRef<'_>, kind: FeaturedKind) -> FeaturedReview {
    let text_or_missing = |css: &str| select_text(marker, css).unwrap_or_else(|| MISSING_TEXT.to_string());

    let customer_id = marker
        .value()
        .attr("id")
        .map(|id| id.trim_start_matches("viewpoint-").to_string())
        .unwrap_or_else(|| MISSING_TEXT.to_string());

    // Vote counts live in the column wrapper, outside the marker element
    let influenced = page
        .query_text(&format!(
            "div.view-point-review.{} span.review-votes",
            kind.marker_class()
        ))
        .and_then(|text| parse_helpful_votes(&text))
        .unwrap_or(0);

    let date = select_text(marker, "span.review-date").and_then(|text| parse_review_date(&text));

    let star_rating = select_text(marker, "i[data-hook='review-star-rating-view-point'] span.a-icon-alt")
        .and_then(|text| parse_star_rating(&text))
        .unwrap_or(0.0);

    FeaturedReview {
        customer_id,
        customer_name: text_or_missing("div.a-profile-content span.a-profile-name"),
        comment: text_or_missing("div.a-row.a-spacing-top-mini"),
        comment_title: text_or_missing("span[data-hook='review-title']"),
        influenced,
        star_rating,
        date,
    }
}

/// `"4.0 out of 5 stars"` gives 4.0.
fn parse_star_rating(text: &str) -> Option<f64> {
    text.split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()
        .filter(|rating| (0.0..=5.0).contains(rating))
}

fn strip_star_suffix(text: &str) -> String {
    STAR_SUFFIX_REGEX.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const REVIEW: &str = r#"
        <div data-hook="review" id="R1ABC">
            <i data-hook="review-star-rating"><span class="a-icon-alt">4.0 out of 5 stars</span></i>
            <a data-hook="review-title"><span>4.0 out of 5 stars</span>
                <span>Great battery</span></a>
            <div id="customer_review-R1ABC"><span>Reviewed in the United States on March 1, 2023</span></div>
            <span data-hook="helpful-vote-statement">Three people found this helpful</span>
        </div>"#;

    #[test]
    fn parses_general_review() {
        let page = parse_reviews_page(REVIEW, 5);
        assert_eq!(
            page.general,
            vec![GeneralReview {
                customer_id: "R1ABC".to_string(),
                star_rating: 4.0,
                comment: "Great battery".to_string(),
                buying_influence: 3,
                date: NaiveDate::from_ymd_opt(2023, 3, 1),
            }]
        );
    }

    #[test]
    fn general_review_fallbacks() {
        let html = r#"
            <div data-hook="review">
                <span class="cr-original-review-content">Translated text</span>
            </div>
            <div data-hook="review" id="R2"></div>"#;

        let page = parse_reviews_page(html, 5);
        assert_eq!(page.general[0].customer_id, "None");
        assert_eq!(page.general[0].comment, "Translated text");
        assert_eq!(page.general[1].comment, "NaN");
        assert_eq!(page.general[1].star_rating, 0.0);
        assert_eq!(page.general[1].buying_influence, 0);
        assert_eq!(page.general[1].date, None);
    }

    #[test]
    fn general_reviews_are_capped() {
        let html = (0..8)
            .map(|i| format!(r#"<div data-hook="review" id="R{}"></div>"#, i))
            .collect::<String>();
        assert_eq!(parse_reviews_page(&html, 5).general.len(), 5);
    }

    #[test]
    fn featured_reviews_by_marker_order() {
        let html = r#"
            <div class="a-column a-span6 view-point-review positive-review">
                <div id="viewpoint-RPOS">
                    <div class="a-profile-content"><span class="a-profile-name">Ada</span></div>
                    <i data-hook="review-star-rating-view-point"><span class="a-icon-alt">5.0 out of 5 stars</span></i>
                    <span data-hook="review-title">Love it</span>
                    <div class="a-expander-content"><span class="review-date">Reviewed in the United States on June 5, 2022</span></div>
                    <div class="a-row a-spacing-top-mini">Works every time</div>
                </div>
                <div class="a-row a-spacing-top-small"><span class="review-votes">42 people found this helpful</span></div>
            </div>
            <div class="a-column a-span6 view-point-review critical-review a-span-last">
                <div id="viewpoint-RCRIT">
                    <span data-hook="review-title">Broke</span>
                    <span class="review-date">Reviewed on sometime</span>
                </div>
            </div>"#;

        let page = parse_reviews_page(html, 5);

        assert_eq!(
            page.top_positive,
            FeaturedReview {
                customer_id: "RPOS".to_string(),
                customer_name: "Ada".to_string(),
                comment: "Works every time".to_string(),
                comment_title: "Love it".to_string(),
                influenced: 42,
                star_rating: 5.0,
                date: NaiveDate::from_ymd_opt(2022, 6, 5),
            }
        );
        assert_eq!(page.critical.customer_id, "RCRIT");
        assert_eq!(page.critical.customer_name, "None");
        assert_eq!(page.critical.comment_title, "Broke");
        assert_eq!(page.critical.influenced, 0);
        assert_eq!(page.critical.date, None);
    }

    #[test]
    fn missing_featured_markers_use_defaults() {
        let page = parse_reviews_page("<html></html>", 5);
        assert_eq!(page.top_positive, FeaturedReview::default());
        assert_eq!(page.critical, FeaturedReview::default());
        assert!(page.general.is_empty());
    }
}

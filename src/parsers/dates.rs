use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static REVIEW_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bon\s+(.+?)\s*$")
        .expect("Invalid review date regex")
});

/// Parse the `on <Month> <Day>, <Year>` tail of a review metadata sentence.
///
/// `"Reviewed in the United States on March 1, 2023"` gives 2023-03-01.
pub fn parse_review_date(text: &str) -> Option<NaiveDate> {
    let Some(captures) = REVIEW_DATE_REGEX.captures(text.trim()) else {
        debug!("Date not found in text: {}", text);
        return None;
    };

    let date_string = &captures[1];
    match NaiveDate::parse_from_str(date_string, "%B %d, %Y") {
        Ok(date) => Some(date),
        Err(e) => {
            debug!("Error parsing date string {}: {}", date_string, e);
            None
        }
    }
}

use once_cell::sync::Lazy;
use regex::Regex;

static PRICE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$([\d,]+\.\d{2})")
        .expect("Invalid price regex")
});

/// Extract the digits of a dollar price, e.g. `"$1,299.00"` gives `"1,299.00"`.
pub fn extract_price(price_text: &str) -> Option<String> {
    PRICE_REGEX
        .captures(price_text)
        .map(|captures| captures[1].to_string())
}

/// Parse a price amount, ignoring currency markers and thousands separators.
pub fn parse_price_amount(price_text: &str) -> Option<f64> {
    let cleaned = price_text
        .replace('$', "")
        .replace("USD", "")
        .replace(',', "")
        .trim()
        .to_string();

    cleaned.parse::<f64>().ok().filter(|p| p.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_dollar_amounts() {
        assert_eq!(extract_price("$1,299.00").as_deref(), Some("1,299.00"));
        assert_eq!(extract_price("Now $19.99 with coupon").as_deref(), Some("19.99"));
        assert_eq!(extract_price("Currently unavailable"), None);
        assert_eq!(extract_price("$20"), None);
    }

    #[test]
    fn parses_amounts() {
        assert_eq!(parse_price_amount("1,299.00"), Some(1299.0));
        assert_eq!(parse_price_amount(" $19.99 "), Some(19.99));
        assert_eq!(parse_price_amount("abc"), None);
        assert_eq!(parse_price_amount("inf"), None);
    }
}

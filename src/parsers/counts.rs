use once_cell::sync::Lazy;
use regex::Regex;

static COUNT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(\d[\d,]*(?:\.\d+)?)\s*(k\+|k\b)?")
        .expect("Invalid count regex")
});

static LEADING_DIGITS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d[\d,]*)")
        .expect("Invalid digits regex")
});

/// Parse a review count such as `"1,234 ratings"` or the abbreviated `"4.5K+"`.
pub fn parse_review_count(text: &str) -> Option<u64> {
    let captures = COUNT_REGEX.captures(text)?;
    let number: f64 = captures.get(1)?.as_str().replace(',', "").parse().ok()?;

    let value = if captures.get(2).is_some() {
        number * 1000.0
    } else {
        number
    };

    if value.is_finite() && value >= 0.0 {
        Some(value.round() as u64)
    } else {
        None
    }
}

/// Parse a helpful-vote statement: leading digits, else a spelled-out first word.
///
/// `"12 people found this helpful"` gives 12, `"One person found this helpful"` gives 1.
pub fn parse_helpful_votes(text: &str) -> Option<u64> {
    if let Some(captures) = LEADING_DIGITS.captures(text) {
        return captures[1].replace(',', "").parse().ok();
    }

    let first_word = text.split_whitespace().next()?;
    word_to_number(first_word)
}

/// Convert a single English number word (`"seven"`, `"Twenty-one"`) to its value.
pub fn word_to_number(word: &str) -> Option<u64> {
    let word = word
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '-')
        .to_lowercase();

    if let Some((tens, units)) = word.split_once('-') {
        let tens = tens_value(tens)?;
        let units = unit_value(units).filter(|u| *u < 10)?;
        return Some(tens + units);
    }

    unit_value(&word)
        .or_else(|| tens_value(&word))
        .or_else(|| match word.as_str() {
            "hundred" => Some(100),
            "thousand" => Some(1000),
            _ => None,
        })
}

fn unit_value(word: &str) -> Option<u64> {
    let value = match word {
        "zero" => 0,
        "one" | "a" | "an" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        _ => return None,
    };
    Some(value)
}

fn tens_value(word: &str) -> Option<u64> {
    let value = match word {
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    };
    Some(value)
}

/// Bump the suffix whenever the token set changes.
pub const NULL_TOKENS_V1: &[&str] = &["NaN", "nan", "None", "none", "N/A", "n/a", "NA", "na", "null", ""];

/// The token set every null check uses.
pub const NULL_TOKENS: &[&str] = NULL_TOKENS_V1;

/// Whether `value` spells a missing value.
pub fn is_null_like(value: &str) -> bool {
    NULL_TOKENS.contains(&value.trim())
}

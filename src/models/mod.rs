pub mod columns;
pub mod product;
pub mod review;

pub use columns::*;
pub use product::*;
pub use review::*;

// Harvester-side placeholders, kept verbatim in the JSON output
pub const MISSING_TEXT: &str = "None";
pub const MISSING_COMMENT: &str = "NaN";

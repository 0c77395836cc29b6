//! Turns loosely-shaped harvested JSON into complete, typed rows.

pub mod clean;
pub mod nulls;
pub mod raw;
pub mod value;

pub use clean::*;
pub use nulls::{is_null_like, NULL_TOKENS, NULL_TOKENS_V1};
pub use raw::*;
pub use value::ColumnValue;

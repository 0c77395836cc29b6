use chrono::NaiveDate;
use rusqlite::types::{ToSql, ToSqlOutput};
use std::fmt;

/// A single cleaned cell, typed the way the destination column is.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(String),
    Real(f64),
    Integer(i64),
    Date(NaiveDate),
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Text(s) => write!(f, "{}", s),
            // Debug keeps the trailing `.0` on whole numbers
            ColumnValue::Real(r) => write!(f, "{:?}", r),
            ColumnValue::Integer(i) => write!(f, "{}", i),
            ColumnValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl ToSql for ColumnValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            ColumnValue::Text(s) => ToSqlOutput::from(s.as_str()),
            ColumnValue::Real(r) => ToSqlOutput::from(*r),
            ColumnValue::Integer(i) => ToSqlOutput::from(*i),
            ColumnValue::Date(d) => ToSqlOutput::from(d.format("%Y-%m-%d").to_string()),
        })
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::Text(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        ColumnValue::Text(value)
    }
}

impl From<f64> for ColumnValue {
    fn from(value: f64) -> Self {
        ColumnValue::Real(value)
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        ColumnValue::Integer(value)
    }
}

impl From<NaiveDate> for ColumnValue {
    fn from(value: NaiveDate) -> Self {
        ColumnValue::Date(value)
    }
}

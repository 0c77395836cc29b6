use async_trait::async_trait;

use crate::error::LoadError;
use crate::normalizer::ColumnValue;

mod sqlite;
pub use sqlite::SqliteStorage;

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Drop the destination table and create it empty.
    async fn recreate_table(&self) -> Result<(), LoadError>;

    /// Number of value placeholders in the insert statement.
    fn placeholder_count(&self) -> usize;

    /// Insert one row in its own transaction; a failure leaves the table untouched.
    async fn insert_row(&self, values: &[ColumnValue]) -> Result<(), LoadError>;

    async fn row_count(&self) -> Result<usize, LoadError>;
}

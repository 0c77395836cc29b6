use async_trait::async_trait;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

use crate::error::LoadError;
use crate::models::{featured, general, COLUMNS};
use crate::normalizer::ColumnValue;
use crate::storage::ProductStore;

pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
    table: String,
    insert_sql: String,
}

impl SqliteStorage {
    pub async fn new(db_path: impl AsRef<Path>, table: &str) -> Result<Self, LoadError> {
        let conn = Connection::open(db_path)?;
        Ok(Self::from_connection(conn, table))
    }

    pub fn in_memory(table: &str) -> Result<Self, LoadError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_connection(conn, table))
    }

    fn from_connection(conn: Connection, table: &str) -> Self {
        let table = quote_identifier(table);
        let insert_sql = insert_statement(&table);
        Self {
            conn: Arc::new(Mutex::new(conn)),
            table,
            insert_sql,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, LoadError> {
        self.conn.lock().map_err(|_| LoadError::LockPoisoned)
    }

    pub fn insert_sql(&self) -> &str {
        &self.insert_sql
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn column_type(column: &str) -> &'static str {
    match column {
        "Product_ID" | "product" | "category" | "url" => "TEXT NOT NULL",
        "price" | "ratings" => "NUMERIC",
        "reviews" => "INTEGER NOT NULL",
        c if c.ends_with(featured::DATE) => "DATE",
        c if c.ends_with(featured::INFLUENCED) || c.ends_with(general::BUYING_INFLUENCE) => "INTEGER",
        c if c.ends_with(featured::STAR_RATING) => "NUMERIC",
        _ => "TEXT",
    }
}

pub fn create_table_statement(table: &str) -> String {
    let columns = COLUMNS
        .iter()
        .map(|column| format!("    {} {}", column, column_type(column)))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("CREATE TABLE IF NOT EXISTS {} (\n{}\n)", table, columns)
}

pub fn insert_statement(table: &str) -> String {
    let placeholders = (1..=COLUMNS.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        COLUMNS.join(", "),
        placeholders
    )
}

#[async_trait]
impl ProductStore for SqliteStorage {
    async fn recreate_table(&self) -> Result<(), LoadError> {
        let conn = self.lock()?;

        conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {};\n{};",
            self.table,
            create_table_statement(&self.table)
        ))?;

        info!("Recreated table {}", self.table);
        Ok(())
    }

    fn placeholder_count(&self) -> usize {
        self.insert_sql.matches('?').count()
    }

    async fn insert_row(&self, values: &[ColumnValue]) -> Result<(), LoadError> {
        let placeholders = self.placeholder_count();
        if values.len() != placeholders {
            return Err(LoadError::ColumnMismatch {
                values: values.len(),
                placeholders,
            });
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(&self.insert_sql, params_from_iter(values.iter()))?;
        tx.commit()?;
        Ok(())
    }

    async fn row_count(&self) -> Result<usize, LoadError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", self.table), [], |row| {
            row.get(0)
        })?;
        Ok(count.max(0) as usize)
    }
}

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::LoadError;
use crate::export::export_csv;
use crate::models::COLUMNS;
use crate::normalizer::{dedupe, missing_columns, read_records, CleanProduct, ColumnValue, RawRecord};
use crate::storage::{ProductStore, SqliteStorage};

/// What happened to one cleaned row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Inserted,
    SkippedMismatch,
    SkippedError,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Objects read from the input file.
    pub loaded: usize,
    pub duplicates: usize,
    pub missing_id: usize,
    pub inserted: usize,
    pub mismatched: usize,
    pub failed: usize,
}

impl LoadSummary {
    fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Inserted => self.inserted += 1,
            RowOutcome::SkippedMismatch => self.mismatched += 1,
            RowOutcome::SkippedError => self.failed += 1,
        }
    }

    pub fn log(&self) {
        info!(
            loaded = self.loaded,
            duplicates = self.duplicates,
            missing_id = self.missing_id,
            inserted = self.inserted,
            mismatched = self.mismatched,
            failed = self.failed,
            "Load finished"
        );
    }
}

#[derive(Debug)]
pub struct LoadOutput {
    /// Every product that survived deduplication, in input order.
    pub products: Vec<CleanProduct>,
    pub summary: LoadSummary,
}

/// Clean, deduplicate and insert `records`. Only a failure to recreate the
/// table aborts; bad rows are logged and counted.
pub async fn load_records(
    records: Vec<RawRecord>,
    store: &dyn ProductStore,
) -> Result<LoadOutput, LoadError> {
    let mut summary = LoadSummary {
        loaded: records.len(),
        ..Default::default()
    };

    let missing = missing_columns(&records);
    if !missing.is_empty() {
        warn!(
            "{} columns absent from every record, using defaults: {}",
            missing.len(),
            missing.join(", ")
        );
    }

    let (records, stats) = dedupe(records);
    summary.duplicates = stats.duplicates;
    summary.missing_id = stats.missing_id;
    if stats.duplicates > 0 {
        info!("Dropped {} duplicate products", stats.duplicates);
    }

    store.recreate_table().await?;

    let products: Vec<CleanProduct> = records.iter().filter_map(CleanProduct::from_raw).collect();

    for product in &products {
        let outcome = insert_product(store, product).await;
        summary.record(outcome);
    }

    Ok(LoadOutput { products, summary })
}

async fn insert_product(store: &dyn ProductStore, product: &CleanProduct) -> RowOutcome {
    let row = product.to_row();
    let placeholders = store.placeholder_count();

    if row.len() != placeholders {
        log_mismatch(product, &row, placeholders);
        return RowOutcome::SkippedMismatch;
    }

    match store.insert_row(&row).await {
        Ok(()) => {
            debug!("Inserted {}", product.product_id);
            RowOutcome::Inserted
        }
        Err(LoadError::ColumnMismatch { placeholders, .. }) => {
            log_mismatch(product, &row, placeholders);
            RowOutcome::SkippedMismatch
        }
        Err(e) => {
            error!("Error inserting row for {}: {}", product.product_id, e);
            RowOutcome::SkippedError
        }
    }
}

fn log_mismatch(product: &CleanProduct, row: &[ColumnValue], placeholders: usize) {
    error!(
        "Column mismatch for {}: {} values, {} placeholders",
        product.product_id,
        row.len(),
        placeholders
    );

    for i in 0..row.len().max(COLUMNS.len()) {
        let column = COLUMNS.get(i).map(String::as_str).unwrap_or("<extra>");
        match row.get(i) {
            Some(value) => error!("  {}: {}", column, value),
            None => error!("  {}: <missing>", column),
        }
    }
}

/// The whole loader stage: read the harvest file, load it and export the CSV.
pub async fn run(config: &Config) -> Result<LoadSummary> {
    let input = Path::new(&config.output.json_path);
    let records = read_records(input)
        .with_context(|| format!("Failed to read harvested data from {}", input.display()))?;
    info!("Read {} records from {}", records.len(), input.display());

    let store = SqliteStorage::new(&config.database.path, &config.database.table)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.path))?;

    let output = load_records(records, &store)
        .await
        .context("Failed to prepare destination table")?;

    export_csv(Path::new(&config.output.csv_path), &output.products)
        .context("Failed to export CSV")?;

    output.summary.log();
    Ok(output.summary)
}

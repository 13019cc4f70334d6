//! Batch cleaning of an existing lead sheet.
//!
//! Takes a CSV produced by an earlier scrape (or any table with name,
//! address and website columns) and:
//!
//! 1. derives a `Zip Code` column from the address column,
//! 2. canonicalizes the website column in place,
//! 3. moves `Zip Code` directly after the address column.
//!
//! Any missing required column aborts the run before anything is written.

use crate::error::CleanError;
use crate::normalize::{canonicalize, extract_zip};
use crate::outputs::table::Table;
use std::path::Path;
use tracing::{error, info, instrument};

/// Header of the derived ZIP column.
pub const ZIP_COLUMN: &str = "Zip Code";

/// Number of rows shown in the log preview after cleaning.
const PREVIEW_ROWS: usize = 10;

/// Names of the columns the cleaner reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanColumns {
    pub name: String,
    pub address: String,
    pub website: String,
}

impl Default for CleanColumns {
    fn default() -> Self {
        Self {
            name: "Place".to_string(),
            address: "Address".to_string(),
            website: "Website".to_string(),
        }
    }
}

/// Clean a table in place.
///
/// # Errors
///
/// [`CleanError::MissingColumns`] listing exactly the required columns that
/// are absent, in name/address/website order. The table is untouched then.
pub fn clean_table(table: &mut Table, columns: &CleanColumns) -> Result<(), CleanError> {
    let missing = table.missing_columns(&[
        columns.name.as_str(),
        columns.address.as_str(),
        columns.website.as_str(),
    ]);
    let (Some(address), Some(website), true) = (
        table.column_index(&columns.address),
        table.column_index(&columns.website),
        missing.is_empty(),
    ) else {
        return Err(CleanError::MissingColumns(missing));
    };

    let zips = table
        .column(address)
        .map(|cell| extract_zip(Some(cell)).unwrap_or_default())
        .collect();
    table.set_column(ZIP_COLUMN, zips);
    table.map_column(website, canonicalize);
    table.move_column_after(ZIP_COLUMN, &columns.address);
    Ok(())
}

/// Load `input`, clean it and write the result to `output`.
///
/// # Errors
///
/// Load failures ([`crate::error::TableError::FileNotFound`] and friends)
/// and [`CleanError::MissingColumns`] are returned before any output is
/// written.
#[instrument(level = "info", skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn clean_file(input: &Path, columns: &CleanColumns, output: &Path) -> Result<Table, CleanError> {
    let mut table = Table::load(input)?;
    info!(records = table.rows.len(), columns = ?table.headers, "Loaded lead sheet");

    if let Err(e) = clean_table(&mut table, columns) {
        error!(error = %e, "Cannot clean lead sheet; update the column names to match the file");
        return Err(e);
    }
    log_preview(&table, columns);

    table.write(output)?;
    info!(rows = table.rows.len(), "Cleaned lead sheet saved");
    Ok(table)
}

fn log_preview(table: &Table, columns: &CleanColumns) {
    let wanted = [
        columns.name.as_str(),
        columns.address.as_str(),
        ZIP_COLUMN,
        columns.website.as_str(),
    ];
    let indexes: Vec<usize> = wanted
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect();

    for (i, row) in table.rows.iter().take(PREVIEW_ROWS).enumerate() {
        let cells: Vec<&str> = indexes.iter().map(|&idx| row[idx].as_str()).collect();
        info!(row = i, ?cells, "Cleaned row");
    }
}

//! In-memory table with CSV load and save.
//!
//! A [`Table`] keeps header names and column order exactly as read. Files are
//! written as UTF-8 with a byte-order mark so spreadsheet applications pick
//! the right encoding, with a header row and no index column.

use crate::error::TableError;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::{info, instrument};

const UTF8_BOM: &str = "\u{feff}";

/// Row-oriented table of string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Load a CSV file. A leading BOM is ignored; short rows are padded with
    /// empty cells and long rows truncated to the header width.
    ///
    /// # Errors
    ///
    /// - [`TableError::FileNotFound`] if `path` does not exist
    /// - [`TableError::MissingHeader`] if the file is empty
    /// - [`TableError::Csv`] / [`TableError::Io`] if it cannot be read or parsed
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let text = fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                TableError::FileNotFound(path.to_path_buf())
            } else {
                TableError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let text = text.strip_prefix(UTF8_BOM).unwrap_or(&text);

        let csv_err = |source| TableError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(str::to_string)
            .collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(TableError::MissingHeader(path.to_path_buf()));
        }

        let width = headers.len();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let mut row: Vec<String> = record.iter().take(width).map(str::to_string).collect();
            row.resize(width, String::new());
            rows.push(row);
        }

        info!(rows = rows.len(), columns = width, "Loaded table");
        Ok(Self { headers, rows })
    }

    /// Write the table as CSV (UTF-8 with BOM, header row included).
    ///
    /// Missing parent directories are created.
    #[instrument(level = "info", skip_all, fields(path = %path.display(), rows = self.rows.len()))]
    pub fn write(&self, path: &Path) -> Result<(), TableError> {
        let io_err = |source| TableError::Io {
            path: path.to_path_buf(),
            source,
        };
        let csv_err = |source| TableError::Csv {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut file = fs::File::create(path).map_err(io_err)?;
        file.write_all(UTF8_BOM.as_bytes()).map_err(io_err)?;

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(&self.headers).map_err(csv_err)?;
        for row in &self.rows {
            writer.write_record(row).map_err(csv_err)?;
        }
        writer.flush().map_err(io_err)?;

        info!("Wrote table");
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Names from `required` that are not headers of this table, in the
    /// order given.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row[index].as_str())
    }

    /// Replace every cell of column `index` with `f(cell)`.
    pub fn map_column(&mut self, index: usize, mut f: impl FnMut(&str) -> String) {
        for row in &mut self.rows {
            row[index] = f(&row[index]);
        }
    }

    /// Overwrite the column called `name`, or append it if absent.
    ///
    /// `values` must hold one cell per row.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> usize {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(index) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
                index
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
                self.headers.len() - 1
            }
        }
    }

    /// Move `column` so it sits immediately after `anchor`, keeping the
    /// relative order of every other column.
    ///
    /// Returns `false` (and changes nothing) if either column is missing or
    /// they are the same column.
    pub fn move_column_after(&mut self, column: &str, anchor: &str) -> bool {
        let (Some(from), Some(_)) = (self.column_index(column), self.column_index(anchor)) else {
            return false;
        };
        if column == anchor {
            return false;
        }

        let header = self.headers.remove(from);
        let to = self.column_index(anchor).map(|i| i + 1).unwrap_or(self.headers.len());
        self.headers.insert(to, header);
        for row in &mut self.rows {
            let cell = row.remove(from);
            row.insert(to, cell);
        }
        true
    }
}

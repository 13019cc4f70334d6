//! Error types for each layer of the pipeline.
//!
//! Failures are contained where they originate:
//!
//! | Error | Scope | Effect |
//! |-------|-------|--------|
//! | [`LoadError`] | one place | the place yields zero leads, the run continues |
//! | [`ExtractError`] | one result card | the record is dropped |
//! | [`TableError`] / [`CleanError`] | one file | fatal to the `clean` command |
//! | [`ConfigError`] | startup | fatal before the browser launches |
//!
//! Missing optional fields on a detail pane are not errors at all; they
//! surface as the `"N/A"` sentinel on the resulting [`crate::models::Lead`].

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a [`crate::browser::BrowserSession`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("{action} failed: {message}")]
    Command {
        action: &'static str,
        message: String,
    },

    #[error("`{selector}` not present after {timeout:?}")]
    Timeout { selector: String, timeout: Duration },
}

impl SessionError {
    pub fn command(action: &'static str, err: impl std::fmt::Display) -> Self {
        SessionError::Command {
            action,
            message: err.to_string(),
        }
    }
}

/// Failure to load the result list for one place.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("results container not found for {place} within {timeout:?}")]
    ContainerNotFound { place: String, timeout: Duration },

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Stage of a single detail extraction at which a session command failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractStage {
    DetailLoad,
    Parse,
}

impl std::fmt::Display for ExtractStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExtractStage::DetailLoad => "detail load",
            ExtractStage::Parse => "parse",
        };
        f.write_str(name)
    }
}

/// Failure to turn one result card into a lead.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("card could not be clicked (pointer: {pointer}; direct: {direct})")]
    ActivationFailed { pointer: String, direct: String },

    #[error("detail pane did not render within {timeout:?}")]
    DetailTimeout { timeout: Duration },

    #[error("{stage} stage failed: {source}")]
    Session {
        stage: ExtractStage,
        #[source]
        source: SessionError,
    },
}

/// Failure reading or writing a delimited table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("{} has no header row", .0.display())]
    MissingHeader(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Failure of the batch-cleaning entry point.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("required columns missing from input: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Failure loading the YAML scraper configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

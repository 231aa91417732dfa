use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool scans, consolidates, or exports plate data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures that are not tied to a specific source file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the run summary cannot be serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the input folder cannot be listed.
    #[error("failed to scan folder {path}: {source}")]
    FolderScan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Errors bubbled up from the Excel reader while opening a source file.
    #[error("Excel read error in {path}: {source}")]
    ExcelRead {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    /// Errors bubbled up from the Excel writer while exporting.
    #[error("Excel write error for {path}: {source}")]
    ExcelWrite {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// Raised when a source `Analysis` sheet lacks one of the fixed columns.
    #[error("schema mismatch in {path}: missing column '{column}'")]
    SchemaMismatch { path: PathBuf, column: String },

    /// Raised when a projection names a column the table does not have.
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// Raised when an assay view does not carry exactly one score column.
    #[error("expected exactly one score column in sheet {sheet}, found {found}")]
    ScoreColumn { sheet: String, found: usize },

    /// Raised when no file in the input folder carries an `Analysis` sheet.
    #[error("no qualifying .xlsx files with an Analysis sheet in {0}")]
    NoQualifyingFiles(PathBuf),

    /// Raised when a path argument is empty, e.g. a cancelled selection.
    #[error("no {0} path was provided")]
    EmptyPath(&'static str),

    /// Raised when the user provides a folder that does not exist.
    #[error("input folder not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

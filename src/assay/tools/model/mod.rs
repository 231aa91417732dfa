use std::fmt;

use serde::Serialize;

use crate::assay::tools::error::{Result, ToolError};

/// Sheet every source workbook must carry to take part in a run.
pub const ANALYSIS_SHEET: &str = "Analysis";
/// Extension a folder entry needs before it is opened at all.
pub const XLSX_EXTENSION: &str = ".xlsx";

pub const PLATE_NUMBER: &str = "plate_number";
pub const WELL_NUMBER: &str = "well_number";
pub const HIGH_CONTROLS: &str = "high_controls";

/// Columns read from each `Analysis` sheet. Extra columns are ignored.
pub const SOURCE_COLUMNS: [&str; 9] = [
    WELL_NUMBER,
    "yemk_z_score",
    "hits_yemk_z_score",
    "phl_z_score",
    "hits_phl_z_score",
    "flip700_z_score",
    "hits_flip700_z_score",
    "live_z_score",
    "hits_live_z_score",
];

/// Column order of the consolidated table.
pub const UNIFIED_COLUMNS: [&str; 11] = [
    PLATE_NUMBER,
    WELL_NUMBER,
    "yemk_z_score",
    "hits_yemk_z_score",
    HIGH_CONTROLS,
    "phl_z_score",
    "hits_phl_z_score",
    "flip700_z_score",
    "hits_flip700_z_score",
    "live_z_score",
    "hits_live_z_score",
];

/// A single spreadsheet cell as it travels through the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    /// Blank cell.
    #[default]
    Empty,
    /// Floating point number; integers and date serials land here too.
    Number(f64),
    /// Plain string.
    Text(String),
    /// Boolean flag.
    Boolean(bool),
}

impl CellValue {
    /// Text form of the cell, used where a value acts as a label.
    pub fn to_label(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(value) => value.to_string(),
            CellValue::Text(value) => value.clone(),
            CellValue::Boolean(value) => value.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// One of the four measurement types reported per well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Assay {
    Yemk,
    Phl,
    Flip700,
    Live,
}

impl Assay {
    /// Every assay, in export sheet order.
    pub const ALL: [Assay; 4] = [Assay::Yemk, Assay::Phl, Assay::Flip700, Assay::Live];

    /// Short name, also used as the exported sheet name.
    pub fn name(self) -> &'static str {
        match self {
            Assay::Yemk => "yemk",
            Assay::Phl => "phl",
            Assay::Flip700 => "flip700",
            Assay::Live => "live",
        }
    }

    pub fn score_column(self) -> &'static str {
        match self {
            Assay::Yemk => "yemk_z_score",
            Assay::Phl => "phl_z_score",
            Assay::Flip700 => "flip700_z_score",
            Assay::Live => "live_z_score",
        }
    }

    pub fn hits_column(self) -> &'static str {
        match self {
            Assay::Yemk => "hits_yemk_z_score",
            Assay::Phl => "hits_phl_z_score",
            Assay::Flip700 => "hits_flip700_z_score",
            Assay::Live => "hits_live_z_score",
        }
    }

    /// Columns of the per-assay view, in export order.
    pub fn view_columns(self) -> [&'static str; 5] {
        [
            PLATE_NUMBER,
            WELL_NUMBER,
            self.score_column(),
            self.hits_column(),
            HIGH_CONTROLS,
        ]
    }
}

impl fmt::Display for Assay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rectangular table with named columns. Every row has one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Creates an empty table with the given header.
    pub fn with_columns<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Position of the first column with the given name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row` in the named column, if both exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    /// Copies the named columns, in the given order, into a new table.
    pub fn select(&self, columns: &[&str]) -> Result<Table> {
        let indices = columns
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| ToolError::MissingColumn((*name).to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|&idx| row.get(idx).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Table {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows,
        })
    }
}

/// One assay-specific projection of the consolidated table.
#[derive(Debug, Clone, PartialEq)]
pub struct AssayView {
    pub assay: Assay,
    pub table: Table,
}

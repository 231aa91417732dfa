use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::assay::tools::error::{Result, ToolError};
use crate::assay::tools::io::excel_read::read_analysis_sheet;
use crate::assay::tools::model::{
    CellValue, HIGH_CONTROLS, PLATE_NUMBER, Table, UNIFIED_COLUMNS, XLSX_EXTENSION,
};
use crate::assay::tools::plate::plate_label;

/// A workbook that contributed rows to the consolidated table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFile {
    pub file_name: String,
    pub plate_number: String,
    pub rows: usize,
}

/// Output of a folder scan: the consolidated table plus what went into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Consolidated {
    /// Rows of every qualifying file, laid out as [`UNIFIED_COLUMNS`].
    pub table: Table,
    pub sources: Vec<SourceFile>,
    /// `.xlsx` files without an `Analysis` sheet.
    pub skipped: Vec<PathBuf>,
}

/// Where a unified column takes its value from.
enum Slot {
    Plate,
    Blank,
    Source(usize),
}

/// Reads the `Analysis` sheet of every `.xlsx` file in `folder` and stacks the
/// rows into one table.
///
/// Files are visited in file-name order. Files without an `Analysis` sheet
/// are skipped; a sheet missing one of the fixed columns aborts the scan, as
/// does a folder with no qualifying file at all.
#[instrument(level = "info", skip_all, fields(folder = %folder.display()))]
pub fn aggregate_folder(folder: &Path) -> Result<Consolidated> {
    let mut consolidated = Consolidated {
        table: Table::with_columns(&UNIFIED_COLUMNS),
        sources: Vec::new(),
        skipped: Vec::new(),
    };

    for path in list_workbooks(folder)? {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let Some(sheet) = read_analysis_sheet(&path)? else {
            warn!(file = %path.display(), "skipping workbook without Analysis sheet");
            consolidated.skipped.push(path);
            continue;
        };

        let plate_number = plate_label(&file_name);
        let rows = append_rows(&mut consolidated.table, &sheet, &plate_number, &path)?;
        debug!(file = %file_name, %plate_number, rows, "appended analysis rows");

        consolidated.sources.push(SourceFile {
            file_name,
            plate_number,
            rows,
        });
    }

    if consolidated.sources.is_empty() {
        return Err(ToolError::NoQualifyingFiles(folder.to_path_buf()));
    }

    info!(
        file_count = consolidated.sources.len(),
        skipped = consolidated.skipped.len(),
        row_count = consolidated.table.len(),
        "consolidated analysis sheets"
    );
    Ok(consolidated)
}

fn list_workbooks(folder: &Path) -> Result<Vec<PathBuf>> {
    let scan_error = |source: std::io::Error| ToolError::FolderScan {
        path: folder.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(folder).map_err(scan_error)? {
        let entry = entry.map_err(scan_error)?;
        let is_workbook = entry
            .file_name()
            .to_string_lossy()
            .ends_with(XLSX_EXTENSION);
        let path = entry.path();
        if is_workbook && path.is_file() {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

fn append_rows(
    target: &mut Table,
    sheet: &Table,
    plate_number: &str,
    path: &Path,
) -> Result<usize> {
    let layout = UNIFIED_COLUMNS
        .iter()
        .map(|&column| match column {
            PLATE_NUMBER => Ok(Slot::Plate),
            HIGH_CONTROLS => Ok(Slot::Blank),
            name => sheet
                .column_index(name)
                .map(Slot::Source)
                .ok_or_else(|| ToolError::SchemaMismatch {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                }),
        })
        .collect::<Result<Vec<_>>>()?;

    for row in &sheet.rows {
        let unified = layout
            .iter()
            .map(|slot| match slot {
                Slot::Plate => CellValue::Text(plate_number.to_string()),
                Slot::Blank => CellValue::Empty,
                Slot::Source(idx) => row.get(*idx).cloned().unwrap_or_default(),
            })
            .collect();
        target.rows.push(unified);
    }

    Ok(sheet.rows.len())
}

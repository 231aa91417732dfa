use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};

use crate::assay::tools::error::{Result, ToolError};
use crate::assay::tools::model::{ANALYSIS_SHEET, CellValue, Table};

/// Reads the `Analysis` sheet of the workbook at `path`.
///
/// Returns `Ok(None)` when the workbook has no such sheet. The first row of
/// the sheet becomes the column header.
pub fn read_analysis_sheet(path: &Path) -> Result<Option<Table>> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| ToolError::ExcelRead {
        path: path.to_path_buf(),
        source,
    })?;

    let range = match workbook.worksheet_range(ANALYSIS_SHEET) {
        None => return Ok(None),
        Some(range_result) => range_result.map_err(|source| ToolError::ExcelRead {
            path: path.to_path_buf(),
            source,
        })?,
    };

    Ok(Some(range_to_table(&range)))
}

fn range_to_table(range: &Range<DataType>) -> Table {
    let headers: Vec<String> = match range.rows().next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_string(Some(cell)))
            .collect(),
        None => return Table::default(),
    };

    let width = headers.len();
    let mut table = Table {
        columns: headers,
        rows: Vec::new(),
    };

    for row in range.rows().skip(1) {
        if row.iter().all(|cell| matches!(cell, DataType::Empty)) {
            continue;
        }
        let mut cells: Vec<CellValue> = row.iter().map(cell_to_value).collect();
        cells.resize(width, CellValue::Empty);
        table.rows.push(cells);
    }

    table
}

fn cell_to_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty => CellValue::Empty,
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Boolean(*value),
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::DateTime(serial) => CellValue::Number(*serial),
        other => CellValue::Text(other.to_string()),
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

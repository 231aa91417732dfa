use std::path::Path;

use rust_xlsxwriter::{TableColumn, Workbook, Worksheet, XlsxError};

use crate::assay::tools::error::{Result, ToolError};
use crate::assay::tools::model::{AssayView, CellValue};

/// Writes one sheet per assay view to the given path, replacing any existing
/// file. Each sheet starts with the header row; no index column is written.
pub fn write_views(path: &Path, views: &[AssayView]) -> Result<()> {
    write_workbook(path, views).map_err(|source| ToolError::ExcelWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn write_workbook(path: &Path, views: &[AssayView]) -> std::result::Result<(), XlsxError> {
    let mut workbook_writer = Workbook::new();

    for view in views {
        let table = &view.table;
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(view.assay.name())?;

        for (col_idx, header) in table.columns.iter().enumerate() {
            worksheet.write_string(0, col_idx as u16, header)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                write_cell(worksheet, (row_idx + 1) as u32, col_idx as u16, cell)?;
            }
        }

        // Header-only views get no table.
        if table.is_empty() {
            continue;
        }

        let columns: Vec<TableColumn> = table
            .columns
            .iter()
            .map(|header| TableColumn::new().set_header(header))
            .collect();
        let mut excel_table = rust_xlsxwriter::Table::new();
        excel_table.set_autofilter(true).set_columns(&columns);

        let col_end = (table.columns.len() as u16).saturating_sub(1);
        let row_end = table.rows.len() as u32;
        worksheet.add_table(0, 0, row_end, col_end, &excel_table)?;
    }

    workbook_writer.save(path)?;
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
) -> std::result::Result<(), XlsxError> {
    match cell {
        CellValue::Empty => {}
        CellValue::Number(value) => {
            worksheet.write_number(row, col, *value)?;
        }
        CellValue::Text(value) => {
            worksheet.write_string(row, col, value)?;
        }
        CellValue::Boolean(value) => {
            worksheet.write_boolean(row, col, *value)?;
        }
    }
    Ok(())
}

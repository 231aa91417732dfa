use std::fs;
use std::path::Path;

use assay_tools::ToolError;
use assay_tools::model::{ANALYSIS_SHEET, Assay, SOURCE_COLUMNS};
use assay_tools::pipeline::{consolidate, with_default_extension};
use assay_tools::plate::PLATE_NUMBER_SENTINEL;
use calamine::{DataType, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

/// Writes a plate workbook whose scores all equal the well's value; hit flags
/// are set for scores above 2.
fn write_plate(path: &Path, wells: &[(&str, f64)]) {
    write_sheet(path, ANALYSIS_SHEET, &SOURCE_COLUMNS, wells);
}

fn write_sheet(path: &Path, sheet_name: &str, columns: &[&str], wells: &[(&str, f64)]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name).expect("sheet named");

    for (col, header) in columns.iter().enumerate() {
        sheet
            .write_string(0, col as u16, *header)
            .expect("header written");
    }
    for (idx, (well, score)) in wells.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, *well).expect("well written");
        for col in 1..columns.len() {
            let col_num = col as u16;
            if col % 2 == 1 {
                sheet.write_number(row, col_num, *score).expect("score written");
            } else {
                sheet
                    .write_boolean(row, col_num, *score > 2.0)
                    .expect("hit written");
            }
        }
    }

    workbook.save(path).expect("fixture saved");
}

fn read_sheet(path: &Path, name: &str) -> Vec<Vec<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("output opened");
    let range = workbook
        .worksheet_range(name)
        .expect("sheet present")
        .expect("sheet read");
    range.rows().map(|row| row.to_vec()).collect()
}

fn number(cell: &DataType) -> Option<f64> {
    cell.get_float().or_else(|| cell.get_int().map(|value| value as f64))
}

fn text(cell: &DataType) -> &str {
    cell.get_string().unwrap_or_default()
}

#[test]
fn single_control_well_is_annotated_in_every_sheet() {
    let input = tempdir().expect("input dir");
    let output_dir = tempdir().expect("output dir");
    write_plate(
        &input.path().join("analysis_L01P02_results.xlsx"),
        &[("A1.", 1.0)],
    );
    let output = output_dir.path().join("combined.xlsx");

    let summary = consolidate(input.path(), &output).expect("consolidated");
    assert_eq!(summary.total_rows, 1);

    let workbook: Xlsx<_> = open_workbook(&output).expect("output opened");
    let names: Vec<String> = workbook.sheet_names().to_vec();
    assert_eq!(names, ["yemk", "phl", "flip700", "live"]);

    for assay in Assay::ALL {
        let rows = read_sheet(&output, assay.name());
        let headers: Vec<&str> = rows[0].iter().map(text).collect();
        assert_eq!(headers, assay.view_columns());
        assert_eq!(rows.len(), 2);
        assert_eq!(text(&rows[1][0]), "L01P0");
        assert_eq!(text(&rows[1][1]), "A1.");
        assert_eq!(number(&rows[1][2]), Some(1.0));
        assert_eq!(rows[1][3], DataType::Bool(false));
        assert_eq!(number(&rows[1][4]), Some(1.0));
    }
}

#[test]
fn rows_from_every_file_are_stacked_in_name_order() {
    let input = tempdir().expect("input dir");
    let wells = [("A1.", 1.0), ("A3.", 2.5), ("B2.", 3.0), ("C4x", 0.5)];
    for name in [
        "analysis_L03P01.xlsx",
        "analysis_L01P01.xlsx",
        "analysis_L02P01.xlsx",
    ] {
        write_plate(&input.path().join(name), &wells);
    }
    let output = input.path().join("out").with_extension("xlsx");

    let summary = consolidate(input.path(), &output).expect("consolidated");
    assert_eq!(summary.total_rows, 12);
    let plates: Vec<&str> = summary
        .sources
        .iter()
        .map(|source| source.plate_number.as_str())
        .collect();
    assert_eq!(plates, ["L01P0", "L02P0", "L03P0"]);

    let rows = read_sheet(&output, "flip700");
    assert_eq!(rows.len(), 13);
    assert_eq!(text(&rows[1][0]), "L01P0");
    assert_eq!(text(&rows[5][0]), "L02P0");
    assert_eq!(text(&rows[12][0]), "L03P0");

    let controls: Vec<Option<f64>> = rows[1..5].iter().map(|row| number(&row[4])).collect();
    assert_eq!(controls, [Some(1.0), None, Some(3.0), None]);
    assert_eq!(rows[3][3], DataType::Bool(true));

    assert_eq!(summary.high_controls.len(), 4);
    assert!(summary.high_controls.values().all(|&count| count == 6));
}

#[test]
fn workbook_without_analysis_sheet_is_skipped() {
    let input = tempdir().expect("input dir");
    write_plate(&input.path().join("analysis_L01P02.xlsx"), &[("A1.", 1.0)]);
    write_sheet(
        &input.path().join("analysis_L09P09.xlsx"),
        "Summary",
        &SOURCE_COLUMNS,
        &[("A1.", 5.0)],
    );
    fs::write(input.path().join("notes.txt"), "not a workbook").expect("notes written");
    let output = input.path().join("combined.xlsx");

    let summary = consolidate(input.path(), &output).expect("consolidated");

    assert_eq!(summary.sources.len(), 1);
    assert_eq!(summary.skipped.len(), 1);
    assert!(summary.skipped[0].ends_with("analysis_L09P09.xlsx"));
    assert_eq!(read_sheet(&output, "yemk").len(), 2);
}

#[test]
fn unrecognised_file_names_carry_the_sentinel_plate() {
    let input = tempdir().expect("input dir");
    write_plate(&input.path().join("plate7.xlsx"), &[("B2.", 0.75)]);
    let output = input.path().join("combined.xlsx");

    let summary = consolidate(input.path(), &output).expect("consolidated");
    assert_eq!(summary.sources[0].plate_number, PLATE_NUMBER_SENTINEL);

    let rows = read_sheet(&output, "phl");
    assert_eq!(text(&rows[1][0]), PLATE_NUMBER_SENTINEL);
    assert_eq!(number(&rows[1][4]), Some(0.75));
}

#[test]
fn missing_column_aborts_before_writing() {
    let input = tempdir().expect("input dir");
    write_plate(&input.path().join("analysis_L01P01.xlsx"), &[("A1.", 1.0)]);
    write_sheet(
        &input.path().join("analysis_L02P01.xlsx"),
        ANALYSIS_SHEET,
        &SOURCE_COLUMNS[..7],
        &[("A1.", 1.0)],
    );
    let output = input.path().join("combined.xlsx");

    let error = consolidate(input.path(), &output).expect_err("schema mismatch");
    match error {
        ToolError::SchemaMismatch { path, column } => {
            assert!(path.ends_with("analysis_L02P01.xlsx"));
            assert_eq!(column, "live_z_score");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
}

#[test]
fn folder_without_qualifying_files_is_an_error() {
    let input = tempdir().expect("input dir");
    write_sheet(
        &input.path().join("analysis_L01P01.xlsx"),
        "Raw",
        &SOURCE_COLUMNS,
        &[("A1.", 1.0)],
    );
    let output = input.path().join("combined.xlsx");

    let error = consolidate(input.path(), &output).expect_err("nothing to consolidate");
    assert!(matches!(error, ToolError::NoQualifyingFiles(_)));
    assert!(!output.exists());
}

#[test]
fn empty_paths_are_rejected() {
    let input = tempdir().expect("input dir");

    let error = consolidate(Path::new(""), &input.path().join("out.xlsx"))
        .expect_err("empty input path");
    assert!(matches!(error, ToolError::EmptyPath("input folder")));

    let error = consolidate(input.path(), Path::new("")).expect_err("empty output path");
    assert!(matches!(error, ToolError::EmptyPath("output file")));
}

#[test]
fn missing_input_folder_is_reported() {
    let scratch = tempdir().expect("scratch dir");
    let missing = scratch.path().join("does-not-exist");

    let error = consolidate(&missing, &scratch.path().join("out.xlsx")).expect_err("missing");
    assert!(matches!(error, ToolError::MissingInput(path) if path == missing));
}

#[test]
fn summary_serialises_assay_counts_by_name() {
    let input = tempdir().expect("input dir");
    write_plate(
        &input.path().join("analysis_L01P02.xlsx"),
        &[("A1.", 1.0), ("A2.", 2.0), ("A5.", 3.0)],
    );
    let output = input.path().join("combined.xlsx");

    let summary = consolidate(input.path(), &output).expect("consolidated");
    let json = serde_json::to_value(&summary).expect("summary serialised");

    assert_eq!(json["high_controls"]["yemk"], 2);
    assert_eq!(json["high_controls"]["flip700"], 2);
    assert_eq!(json["sources"][0]["plate_number"], "L01P0");
    assert_eq!(json["sources"][0]["rows"], 3);
}

#[test]
fn existing_output_file_is_replaced() {
    let input = tempdir().expect("input dir");
    let output_dir = tempdir().expect("output dir");
    write_plate(&input.path().join("analysis_L01P02.xlsx"), &[("A2.", 4.0)]);
    let output = output_dir.path().join("combined.xlsx");
    fs::write(&output, "stale contents").expect("stale output written");

    consolidate(input.path(), &output).expect("consolidated");

    let workbook: Xlsx<_> = open_workbook(&output).expect("output opened");
    let names: Vec<String> = workbook.sheet_names().to_vec();
    assert_eq!(names, ["yemk", "phl", "flip700", "live"]);
    let rows = read_sheet(&output, "live");
    assert_eq!(number(&rows[1][4]), Some(4.0));
}

#[test]
fn unreadable_workbook_aborts_with_its_path() {
    let input = tempdir().expect("input dir");
    write_plate(&input.path().join("analysis_L01P02.xlsx"), &[("A1.", 1.0)]);
    fs::write(input.path().join("broken.xlsx"), "not a zip archive").expect("broken written");
    let output = input.path().join("combined.xlsx");

    let error = consolidate(input.path(), &output).expect_err("unreadable source");
    match &error {
        ToolError::ExcelRead { path, .. } => assert!(path.ends_with("broken.xlsx")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(error.to_string().contains("broken.xlsx"));
    assert!(!output.exists());
}

#[test]
fn header_only_analysis_sheet_yields_header_only_sheets() {
    let input = tempdir().expect("input dir");
    write_plate(&input.path().join("analysis_L01P02.xlsx"), &[]);
    let output = input.path().join("combined.xlsx");

    let summary = consolidate(input.path(), &output).expect("consolidated");
    assert_eq!(summary.total_rows, 0);
    assert_eq!(summary.sources[0].rows, 0);
    assert!(summary.high_controls.values().all(|&count| count == 0));

    for assay in Assay::ALL {
        let rows = read_sheet(&output, assay.name());
        assert_eq!(rows.len(), 1);
        let headers: Vec<&str> = rows[0].iter().map(text).collect();
        assert_eq!(headers, assay.view_columns());
    }
}

#[test]
fn output_path_defaults_to_xlsx() {
    assert_eq!(
        with_default_extension(Path::new("results/combined")),
        Path::new("results/combined.xlsx")
    );
    assert_eq!(
        with_default_extension(Path::new("results/combined.xlsx")),
        Path::new("results/combined.xlsx")
    );
}

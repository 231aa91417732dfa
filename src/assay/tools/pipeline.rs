use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};

use crate::assay::tools::aggregate::{SourceFile, aggregate_folder};
use crate::assay::tools::annotate::populate_high_controls;
use crate::assay::tools::error::{Result, ToolError};
use crate::assay::tools::io::excel_write;
use crate::assay::tools::model::Assay;
use crate::assay::tools::split::split_by_assay;

/// What a consolidation run read and wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub output: PathBuf,
    pub sources: Vec<SourceFile>,
    pub skipped: Vec<PathBuf>,
    pub total_rows: usize,
    /// Annotated high-control rows per assay.
    pub high_controls: BTreeMap<Assay, usize>,
}

/// Consolidates every plate workbook in `input` into one workbook at
/// `output` with a `yemk`, `phl`, `flip700` and `live` sheet.
///
/// Nothing is written unless every source file was consolidated.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn consolidate(input: &Path, output: &Path) -> Result<RunSummary> {
    ensure_path_given(input, "input folder")?;
    ensure_path_given(output, "output file")?;
    if !input.is_dir() {
        return Err(ToolError::MissingInput(input.to_path_buf()));
    }

    let consolidated = aggregate_folder(input)?;
    let mut views = split_by_assay(&consolidated.table)?;

    let mut high_controls = BTreeMap::new();
    for view in &mut views {
        let annotated = populate_high_controls(view)?;
        high_controls.insert(view.assay, annotated);
    }

    excel_write::write_views(output, &views)?;
    info!(
        row_count = consolidated.table.len(),
        sheet_count = views.len(),
        "wrote consolidated workbook"
    );

    Ok(RunSummary {
        output: output.to_path_buf(),
        sources: consolidated.sources,
        skipped: consolidated.skipped,
        total_rows: consolidated.table.len(),
        high_controls,
    })
}

/// Appends `.xlsx` to an output path that has no extension.
pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() || path.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        path.with_extension("xlsx")
    }
}

fn ensure_path_given(path: &Path, role: &'static str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(ToolError::EmptyPath(role));
    }
    Ok(())
}

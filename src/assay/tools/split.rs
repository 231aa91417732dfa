use tracing::{debug, instrument};

use crate::assay::tools::error::Result;
use crate::assay::tools::model::{Assay, AssayView, Table};

/// Projects the consolidated table into one independent view per assay.
///
/// Views are copies in [`Assay::ALL`] order and keep every row.
#[instrument(level = "debug", skip_all, fields(row_count = unified.len()))]
pub fn split_by_assay(unified: &Table) -> Result<Vec<AssayView>> {
    Assay::ALL
        .iter()
        .map(|&assay| {
            let table = unified.select(&assay.view_columns())?;
            debug!(%assay, row_count = table.len(), "projected assay view");
            Ok(AssayView { assay, table })
        })
        .collect()
}

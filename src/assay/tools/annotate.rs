use tracing::{debug, instrument};

use crate::assay::tools::error::{Result, ToolError};
use crate::assay::tools::model::{AssayView, HIGH_CONTROLS, WELL_NUMBER};
use crate::assay::tools::well::is_high_control;

/// Copies the assay score into `high_controls` for every high-control well.
///
/// The score column is the single column whose name contains `z_score` but
/// not `hits`. Other rows keep their current `high_controls` value, so a
/// second pass changes nothing. Returns the number of annotated rows.
#[instrument(level = "debug", skip_all, fields(assay = %view.assay))]
pub fn populate_high_controls(view: &mut AssayView) -> Result<usize> {
    let table = &mut view.table;

    let score_columns: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, name)| name.contains("z_score") && !name.contains("hits"))
        .map(|(idx, _)| idx)
        .collect();
    let [score_idx] = score_columns[..] else {
        return Err(ToolError::ScoreColumn {
            sheet: view.assay.name().to_string(),
            found: score_columns.len(),
        });
    };

    let well_idx = table
        .column_index(WELL_NUMBER)
        .ok_or_else(|| ToolError::MissingColumn(WELL_NUMBER.to_string()))?;
    let controls_idx = table
        .column_index(HIGH_CONTROLS)
        .ok_or_else(|| ToolError::MissingColumn(HIGH_CONTROLS.to_string()))?;

    let mut annotated = 0;
    for row in &mut table.rows {
        let is_control = row
            .get(well_idx)
            .is_some_and(|well| is_high_control(&well.to_label()));
        if !is_control {
            continue;
        }
        let score = row.get(score_idx).cloned().unwrap_or_default();
        if let Some(slot) = row.get_mut(controls_idx) {
            *slot = score;
            annotated += 1;
        }
    }

    debug!(annotated, "populated high controls");
    Ok(annotated)
}

//! Plate identifiers derived from source file names.
//!
//! Plate-reader exports are named like `analysis_L01P02_results.xlsx`; the
//! plate identifier runs from the first `L` and ends one character after the
//! next `P` (`L01P0`).

use tracing::warn;

/// Marker a file name must contain before extraction is attempted.
pub const ANALYSIS_MARKER: &str = "analysis_";

/// Label written into the data when no identifier can be extracted.
pub const PLATE_NUMBER_SENTINEL: &str = "ERROR_GETTING_FILE_NAME";

/// Extracts the plate identifier from a file name.
///
/// Returns `None` when the name lacks the `analysis_` marker, has no `L`, or
/// has no `P` at or after the first `L`. When the `P` is the last character
/// the identifier ends with it.
pub fn extract_plate_number(file_name: &str) -> Option<&str> {
    if !file_name.contains(ANALYSIS_MARKER) {
        return None;
    }

    let start = file_name.find('L')?;
    let p_index = start + file_name[start..].find('P')?;
    let after_p = p_index + 1;
    let end = file_name[after_p..]
        .chars()
        .next()
        .map_or(file_name.len(), |next| after_p + next.len_utf8());

    Some(&file_name[start..end])
}

/// Plate label stored in every row read from `file_name`, falling back to
/// [`PLATE_NUMBER_SENTINEL`].
pub fn plate_label(file_name: &str) -> String {
    match extract_plate_number(file_name) {
        Some(plate) => plate.to_string(),
        None => {
            warn!(file_name, "could not derive plate number from file name");
            PLATE_NUMBER_SENTINEL.to_string()
        }
    }
}

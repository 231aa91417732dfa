/// Whether a well label denotes a high-control well.
///
/// Labels are a row letter, a sub-position digit and a `.` separator; the
/// controls sit in sub-positions `1` and `2`. Anything shorter than three
/// characters is never a control.
pub fn is_high_control(well_number: &str) -> bool {
    let mut chars = well_number.chars();
    let (Some(_row), Some(position), Some(separator)) = (chars.next(), chars.next(), chars.next())
    else {
        return false;
    };

    matches!(position, '1' | '2') && separator == '.'
}

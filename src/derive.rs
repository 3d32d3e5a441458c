use crate::dates::parse_timestamp;
use crate::model::{AttendanceStatus, BasicRecord, Checked, CompleteRecord, Regarding};

/// `lowercase(trim(first)) + " " + lowercase(trim(last))`.
pub fn merge_name(first: Option<&str>, last: Option<&str>) -> String {
    format!(
        "{} {}",
        first.unwrap_or_default().trim().to_lowercase(),
        last.unwrap_or_default().trim().to_lowercase()
    )
}

fn check<T>(raw: Option<&str>, parse: fn(&str) -> Option<T>) -> Checked<T> {
    match raw.and_then(parse) {
        Some(v) => Checked::Known(v),
        None => Checked::Unrecognized(raw.unwrap_or_default().to_string()),
    }
}

/// Adds the computed fields to a validated row.
pub fn complete(mut basic: BasicRecord) -> CompleteRecord {
    let merge = merge_name(basic.first_name.as_deref(), basic.last_name.as_deref());
    basic.merge_name = Some(merge.clone());
    CompleteRecord {
        merge_name: merge,
        regarding: check(basic.regarding.as_deref(), Regarding::parse),
        attendance_status: check(basic.attendance_status.as_deref(), AttendanceStatus::parse),
        day_submitted: basic.timestamp.as_deref().and_then(parse_timestamp),
        basic,
    }
}

use crate::dates::parse_timestamp;
use crate::model::{AttendanceStatus, BasicRecord, Column, Regarding};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Issue(String),
    Invalid,
}

impl Verdict {
    pub fn into_issue(self, column: Column) -> Option<String> {
        match self {
            Verdict::Valid => None,
            Verdict::Issue(message) => Some(message),
            Verdict::Invalid => Some(format!("Invalid value for column \"{}\"", column.header())),
        }
    }
}

pub type Field = fn(&BasicRecord) -> Option<&str>;

/// Checks one field. Receives the field's cell and the whole row for
/// cross-field rules.
pub type Validator = fn(Option<&str>, Column, &BasicRecord) -> Verdict;

pub const ROW_VALIDATIONS: [(Column, Field, Validator); 5] = [
    (Column::Regarding, |r| r.regarding.as_deref(), regarding),
    (
        Column::AttendanceStatus,
        |r| r.attendance_status.as_deref(),
        attendance_status,
    ),
    (Column::Timestamp, |r| r.timestamp.as_deref(), date),
    (
        Column::SelectedDate,
        |r| r.selected_date.as_deref(),
        selected_date,
    ),
    (Column::Hours, |r| r.hours.as_deref(), hours),
];

pub fn validate_record(record: &BasicRecord) -> Vec<String> {
    let issues: Vec<String> = ROW_VALIDATIONS
        .iter()
        .filter_map(|(column, field, check)| {
            check(field(record), *column, record).into_issue(*column)
        })
        .collect();
    if !issues.is_empty() {
        log::debug!("invalid row data {record:?}: {issues:?}");
    }
    issues
}

fn invalid_value(column: Column, value: Option<&str>) -> Verdict {
    let label = column.header().trim_end().trim_end_matches(':');
    Verdict::Issue(format!(
        "Invalid value for \"{label}\": \"{}\"",
        value.unwrap_or_default()
    ))
}

fn regarding(value: Option<&str>, column: Column, _: &BasicRecord) -> Verdict {
    match value.and_then(Regarding::parse) {
        Some(_) => Verdict::Valid,
        None => invalid_value(column, value),
    }
}

fn attendance_status(value: Option<&str>, column: Column, row: &BasicRecord) -> Verdict {
    let is_shop = row.regarding.as_deref().and_then(Regarding::parse) == Some(Regarding::ShopHours);
    if is_shop && value.and_then(AttendanceStatus::parse).is_none() {
        return invalid_value(column, value);
    }
    Verdict::Valid
}

fn date(value: Option<&str>, column: Column, _: &BasicRecord) -> Verdict {
    match value.and_then(parse_timestamp) {
        Some(_) => Verdict::Valid,
        None => Verdict::Issue(format!(
            "Invalid date for {}: \"{}\"",
            column.header(),
            value.unwrap_or_default()
        )),
    }
}

fn selected_date(value: Option<&str>, column: Column, row: &BasicRecord) -> Verdict {
    match value {
        Some(v) if !v.is_empty() => date(value, column, row),
        _ => Verdict::Valid,
    }
}

fn hours(value: Option<&str>, column: Column, row: &BasicRecord) -> Verdict {
    let is_volunteer =
        row.regarding.as_deref().and_then(Regarding::parse) == Some(Regarding::VolunteerHours);
    if is_volunteer && !coerce_number(value).is_finite() {
        return invalid_value(column, value);
    }
    Verdict::Valid
}

/// Numeric reading of a cell with the export's loose rules: surrounding
/// whitespace ignored, blank is zero, `0x`/`0o`/`0b` prefixes allowed, an
/// absent cell or any other text is NaN.
pub fn coerce_number(value: Option<&str>) -> f64 {
    let Some(value) = value else {
        return f64::NAN;
    };
    let s = value.trim();
    if s.is_empty() {
        return 0.0;
    }
    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = s
            .strip_prefix(prefix)
            .or_else(|| s.strip_prefix(&prefix.to_uppercase()))
        {
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }
    // one sign at most
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    match unsigned {
        "Infinity" => {
            if s.starts_with('-') {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        }
        // `f64::from_str` also takes "inf" and "nan"; those are not numbers here
        rest if rest.starts_with(|c: char| c.is_ascii_digit() || c == '.') => {
            s.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

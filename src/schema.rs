use crate::model::{Column, LEGACY_ATTENDANCE_HEADER};
use clap::ValueEnum;

/// Revisions of the form's export. New columns get a new variant here rather
/// than touching [`validate_header`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SchemaVersion {
    Legacy,
    #[default]
    Current,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 2] = [SchemaVersion::Legacy, SchemaVersion::Current];

    pub fn columns(self) -> Vec<&'static str> {
        match self {
            SchemaVersion::Current => Column::SOURCE.iter().map(|c| c.header()).collect(),
            SchemaVersion::Legacy => Column::SOURCE
                .iter()
                .filter(|c| **c != Column::SelectedDate)
                .map(|c| match c {
                    Column::AttendanceStatus => LEGACY_ATTENDANCE_HEADER,
                    other => other.header(),
                })
                .collect(),
        }
    }

    /// Picks the version the header drifts least from. Ties go to `Current`.
    pub fn detect(fields: &[String]) -> Self {
        if fields.is_empty() {
            return SchemaVersion::Current;
        }
        let mut best = SchemaVersion::Current;
        let mut best_score = drift(fields, &best.columns());
        for version in Self::ALL {
            let score = drift(fields, &version.columns());
            if score < best_score {
                best = version;
                best_score = score;
            }
        }
        log::debug!("detected schema {best:?} (drift {best_score})");
        best
    }
}

fn drift(fields: &[String], expected: &[&str]) -> usize {
    let missing = expected
        .iter()
        .filter(|col| !fields.iter().any(|f| f == *col))
        .count();
    let unknown = fields
        .iter()
        .filter(|f| !expected.contains(&f.as_str()))
        .count();
    missing + unknown
}

pub const NO_FIELDS_ISSUE: &str = "Unable to validate data. No fields found in CSV data";

/// Compares the parsed header row against the expected columns.
pub fn validate_header(fields: Option<&[String]>, version: SchemaVersion) -> Vec<String> {
    let Some(fields) = fields else {
        log::warn!("no header row to validate");
        return vec![NO_FIELDS_ISSUE.to_string()];
    };
    let expected = version.columns();
    let mut issues = Vec::new();

    let missing: Vec<&str> = expected
        .iter()
        .copied()
        .filter(|col| !fields.iter().any(|f| f == col))
        .collect();
    if !missing.is_empty() {
        issues.push(format!("Missing fields: {}", quoted_list(missing)));
    }

    let unknown: Vec<&str> = fields
        .iter()
        .map(String::as_str)
        .filter(|f| !expected.contains(f))
        .collect();
    if !unknown.is_empty() {
        issues.push(format!("Unknown fields: {}", quoted_list(unknown)));
    }

    if !issues.is_empty() {
        log::warn!("header drifts from {version:?} schema: {}", issues.join("; "));
    }
    issues
}

fn quoted_list(names: Vec<&str>) -> String {
    names
        .into_iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

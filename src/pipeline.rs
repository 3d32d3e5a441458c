use crate::aggregate::{StudentStatsMap, aggregate};
use crate::calendar::ShopCalendar;
use crate::consistency::{check_shop_days, shop_day_attendance};
use crate::derive::complete;
use crate::mapping::map_record;
use crate::model::{CompleteRecord, ShopDayAttendance, StatsIssue};
use crate::parse::parse_document;
use crate::sanitize::strip_blank_rows;
use crate::schema::{SchemaVersion, validate_header};
use crate::validate::validate_record;
use std::collections::BTreeMap;

pub const EMPTY_DOCUMENT_ISSUE: &str = "No CSV data found in file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaChoice {
    Fixed(SchemaVersion),
    #[default]
    Detect,
}

/// Everything one ingestion run produces. Built fresh on every call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ingestion {
    pub schema: SchemaVersion,
    pub records: Vec<CompleteRecord>,
    pub issues: Vec<String>,
    pub stats: StudentStatsMap,
    pub stats_issues: Vec<StatsIssue>,
    pub attendance: BTreeMap<String, Vec<ShopDayAttendance>>,
}

impl Ingestion {
    pub fn recheck(&mut self, calendar: &ShopCalendar) {
        self.stats_issues = check_shop_days(&self.stats, calendar);
        self.attendance = shop_day_attendance(&self.stats, calendar);
    }
}

/// Runs the whole pipeline over one document.
///
/// Never fails: every problem in the data ends up in `issues` or
/// `stats_issues` next to a best-effort result.
pub fn ingest(document: &str, calendar: &ShopCalendar, schema: SchemaChoice) -> Ingestion {
    let mut out = Ingestion::default();

    let text = strip_blank_rows(document);
    if text.trim().is_empty() {
        out.issues.push(EMPTY_DOCUMENT_ISSUE.to_string());
        return out;
    }

    let parsed = parse_document(&text);
    out.issues
        .extend(parsed.errors.iter().map(ToString::to_string));

    out.schema = match (schema, parsed.fields.as_deref()) {
        (SchemaChoice::Fixed(version), _) => version,
        (SchemaChoice::Detect, Some(fields)) => SchemaVersion::detect(fields),
        (SchemaChoice::Detect, None) => SchemaVersion::default(),
    };
    out.issues
        .extend(validate_header(parsed.fields.as_deref(), out.schema));

    for raw in &parsed.records {
        let basic = map_record(raw);
        out.issues.extend(validate_record(&basic));
        out.records.push(complete(basic));
    }

    out.stats = aggregate(&out.records);
    out.recheck(calendar);

    log::info!(
        "ingested {} records: {} issues, {} shop day issues",
        out.records.len(),
        out.issues.len(),
        out.stats_issues.len()
    );
    out
}

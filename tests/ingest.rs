use hourbook::consistency::MAX_STATS_ISSUES;
use hourbook::model::{AttendanceStatus, Checked, Column, StatsIssueKind};
use hourbook::{SchemaChoice, SchemaVersion, ShopCalendar, ingest};
use pretty_assertions::assert_eq;

const VOLUNTEER: &str =
    "Volunteer hours (team hosted event including Helping at Competition / outreach)";

/// Builds an export with the given header and rows of `(column, value)` cells.
fn export(header: &[&str], rows: &[Vec<(Column, &str)>]) -> String {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(header).unwrap();
    for row in rows {
        let cells: Vec<&str> = header
            .iter()
            .map(|h| {
                row.iter()
                    .find(|(c, _)| c.header() == *h || c.aliases().contains(h))
                    .map_or("", |(_, v)| *v)
            })
            .collect();
        wtr.write_record(&cells).unwrap();
    }
    String::from_utf8(wtr.into_inner().unwrap()).unwrap()
}

fn current(rows: &[Vec<(Column, &str)>]) -> String {
    export(&SchemaVersion::Current.columns(), rows)
}

fn shop(
    first: &'static str,
    last: &'static str,
    timestamp: &'static str,
    status: &'static str,
) -> Vec<(Column, &'static str)> {
    vec![
        (Column::FirstName, first),
        (Column::LastName, last),
        (Column::Regarding, "Shop hours"),
        (Column::AttendanceStatus, status),
        (Column::Timestamp, timestamp),
    ]
}

fn volunteer(
    first: &'static str,
    last: &'static str,
    hours: &'static str,
) -> Vec<(Column, &'static str)> {
    vec![
        (Column::FirstName, first),
        (Column::LastName, last),
        (Column::Regarding, VOLUNTEER),
        (Column::Hours, hours),
        (Column::Timestamp, "10/1/2024 12:00:00"),
    ]
}

#[test]
fn duplicate_day_on_a_shop_day() {
    let doc = current(&[
        shop("Ann", "Lee", "10/1/2024 15:00:00", "Present"),
        shop("Ann", "Lee", "10/1/2024 17:30:00", "Present"),
    ]);
    let mut calendar = ShopCalendar::empty();
    calendar.set("2024-10-01", true);

    let out = ingest(&doc, &calendar, SchemaChoice::Detect);
    assert!(out.issues.is_empty(), "{:?}", out.issues);
    assert_eq!(out.stats.get("ann lee").unwrap().shop_days_present, 2);
    assert_eq!(out.stats_issues.len(), 1);
    assert_eq!(out.stats_issues[0].student, "ann lee");
    assert_eq!(out.stats_issues[0].date, "2024-10-01");
    assert_eq!(out.stats_issues[0].issue, StatsIssueKind::DuplicateEntry);
}

#[test]
fn entry_on_an_unlisted_day() {
    let doc = current(&[shop("Bo", "Park", "10/5/2024 15:00:00", "Present")]);
    let out = ingest(&doc, &ShopCalendar::default(), SchemaChoice::Detect);
    assert_eq!(out.stats.get("bo park").unwrap().shop_days_present, 1);
    assert_eq!(out.stats_issues.len(), 1);
    assert_eq!(out.stats_issues[0].issue, StatsIssueKind::NonShopDay);
}

#[test]
fn bad_hours_turn_total_into_nan() {
    let doc = current(&[volunteer("Cy", "Ng", "3"), volunteer("Cy", "Ng", "abc")]);
    let out = ingest(&doc, &ShopCalendar::default(), SchemaChoice::Detect);
    assert!(out.stats.get("cy ng").unwrap().volunteer_hours.is_nan());
    assert_eq!(
        out.issues,
        vec!["Invalid value for \"How many hours did you clock?\": \"abc\"".to_string()]
    );
}

#[test]
fn missing_column_20_is_reported_once() {
    let header: Vec<&str> = SchemaVersion::Current
        .columns()
        .into_iter()
        .filter(|h| *h != "Column 20")
        .collect();
    let doc = export(&header, &[volunteer("Di", "Cruz", "2")]);
    let out = ingest(
        &doc,
        &ShopCalendar::default(),
        SchemaChoice::Fixed(SchemaVersion::Current),
    );
    let missing: Vec<&String> = out
        .issues
        .iter()
        .filter(|i| i.starts_with("Missing fields"))
        .collect();
    assert_eq!(missing, vec!["Missing fields: \"Column 20\""]);
    assert_eq!(out.records.len(), 1);
    assert_eq!(out.stats.get("di cruz").unwrap().volunteer_hours, 2.0);
}

#[test]
fn sixty_duplicates_are_capped() {
    let rows: Vec<_> = (0..61)
        .map(|_| shop("Eve", "Moss", "10/2/2024 15:00:00", "Present"))
        .collect();
    let out = ingest(&current(&rows), &ShopCalendar::default(), SchemaChoice::Detect);
    assert_eq!(out.stats.get("eve moss").unwrap().shop_days_present, 61);
    assert!(!out.stats_issues.is_empty());
    assert_eq!(out.stats_issues.len(), MAX_STATS_ISSUES);
}

#[test]
fn absent_shop_rows_still_count() {
    let doc = current(&[
        shop("Fay", "Ito", "10/1/2024 15:00:00", "Absent"),
        shop("Fay", "Ito", "10/2/2024 15:00:00", "APPROVED"),
    ]);
    let out = ingest(&doc, &ShopCalendar::default(), SchemaChoice::Detect);
    let fay = out.stats.get("fay ito").unwrap();
    assert_eq!(fay.shop_days_present, 2);
    assert_eq!(fay.shop_day_entries.len(), 2);
    let statuses: Vec<String> = out.attendance["fay ito"]
        .iter()
        .map(|d| d.status.to_string())
        .collect();
    assert_eq!(statuses, vec!["Absent", "APPROVED", "Absent (no entry)"]);
}

#[test]
fn unknown_category_is_one_issue_and_no_counts() {
    let doc = current(&[vec![
        (Column::FirstName, "Gil"),
        (Column::LastName, "Ray"),
        (Column::Regarding, "Bake sale"),
        (Column::Hours, "5"),
        (Column::Timestamp, "10/1/2024 12:00:00"),
    ]]);
    let out = ingest(&doc, &ShopCalendar::default(), SchemaChoice::Detect);
    assert_eq!(
        out.issues,
        vec!["Invalid value for \"This is in regards to\": \"Bake sale\"".to_string()]
    );
    let gil = out.stats.get("gil ray").unwrap();
    assert_eq!(gil.volunteer_hours, 0.0);
    assert_eq!(gil.shop_days_present, 0);
}

#[test]
fn merge_name_ignores_the_sheet() {
    let mut row = volunteer("  Hana ", "KIM", "1");
    row.push((Column::MergeName, "somebody else"));
    let out = ingest(&current(&[row]), &ShopCalendar::default(), SchemaChoice::Detect);
    assert_eq!(out.records[0].merge_name, "hana kim");
    assert!(out.stats.get("somebody else").is_none());
}

#[test]
fn blank_spreadsheet_rows_are_ignored() {
    let doc = current(&[volunteer("Ivy", "Poe", "2")]);
    let with_blanks = doc
        .replace("\r\n", "\n")
        .replace('\n', "\r\n,,,,,,,,,,,,,,,,,,,,,,,\r\n");
    let out = ingest(&with_blanks, &ShopCalendar::default(), SchemaChoice::Detect);
    assert!(out.issues.is_empty(), "{:?}", out.issues);
    assert_eq!(out.records.len(), 1);
}

#[test]
fn legacy_export_is_detected() {
    let doc = export(
        &SchemaVersion::Legacy.columns(),
        &[shop("Jo", "Day", "10/3/2024 15:00:00", "Present")],
    );
    let out = ingest(&doc, &ShopCalendar::default(), SchemaChoice::Detect);
    assert_eq!(out.schema, SchemaVersion::Legacy);
    assert!(out.issues.is_empty(), "{:?}", out.issues);
    assert_eq!(out.stats.get("jo day").unwrap().shop_days_present, 1);
}

#[test]
fn rerunning_gives_identical_results() {
    let doc = current(&[
        shop("Kai", "Orr", "10/1/2024 15:00:00", "Present"),
        shop("Kai", "Orr", "10/1/2024 15:00:00", "Maybe"),
        volunteer("Kai", "Orr", "x"),
    ]);
    let calendar = ShopCalendar::default();
    let first = ingest(&doc, &calendar, SchemaChoice::Detect);
    let second = ingest(&doc, &calendar, SchemaChoice::Detect);
    assert_eq!(first.issues, second.issues);
    assert_eq!(first.stats_issues, second.stats_issues);
    assert_eq!(first.records, second.records);
    // NaN != NaN, so compare the parts that stay comparable
    let (a, b) = (first.stats.get("kai orr").unwrap(), second.stats.get("kai orr").unwrap());
    assert_eq!(a.shop_days_present, b.shop_days_present);
    assert_eq!(a.shop_day_entries, b.shop_day_entries);
    assert!(a.volunteer_hours.is_nan() && b.volunteer_hours.is_nan());
}

#[test]
fn recheck_follows_calendar_changes() {
    let doc = current(&[shop("Lu", "Vo", "10/9/2024 15:00:00", "Present")]);
    let mut out = ingest(&doc, &ShopCalendar::default(), SchemaChoice::Detect);
    assert_eq!(out.stats_issues.len(), 1);

    let mut calendar = ShopCalendar::default();
    calendar.set("2024-10-09", true);
    out.recheck(&calendar);
    assert!(out.stats_issues.is_empty());
    let lu = &out.attendance["lu vo"];
    assert_eq!(lu.len(), 4);
    assert_eq!(lu.iter().filter(|d| d.is_missed()).count(), 3);
}

#[test]
fn twelve_hour_timestamps_count_on_their_day() {
    let doc = current(&[
        shop("Mo", "Ng", "10/1/2024 3:04:05 PM", "Present"),
        shop("Mo", "Ng", "Oct 2, 2024", "Present"),
    ]);
    let out = ingest(&doc, &ShopCalendar::default(), SchemaChoice::Detect);
    assert!(out.issues.is_empty(), "{:?}", out.issues);
    assert!(out.stats_issues.is_empty(), "{:?}", out.stats_issues);
    let missed: Vec<&str> = out.attendance["mo ng"]
        .iter()
        .filter(|d| d.is_missed())
        .map(|d| d.date.as_str())
        .collect();
    assert_eq!(missed, vec!["2024-10-03"]);
}

#[test]
fn repeated_header_keeps_the_first_column() {
    let columns = SchemaVersion::Current.columns();
    let row = shop("Nia", "Oh", "10/2/2024 15:00:00", "Present");
    let mut cells: Vec<&str> = columns
        .iter()
        .map(|h| row.iter().find(|(c, _)| c.header() == *h).map_or("", |(_, v)| *v))
        .collect();
    cells.push("not a date");
    let mut header = columns.clone();
    header.push("Timestamp");

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(&header).unwrap();
    wtr.write_record(&cells).unwrap();
    let doc = String::from_utf8(wtr.into_inner().unwrap()).unwrap();

    let out = ingest(&doc, &ShopCalendar::default(), SchemaChoice::Detect);
    assert_eq!(out.schema, SchemaVersion::Current);
    assert_eq!(out.issues, vec!["Unknown fields: \"Timestamp_1\"".to_string()]);
    assert_eq!(
        out.records[0].basic.timestamp.as_deref(),
        Some("10/2/2024 15:00:00")
    );
    assert_eq!(out.stats.get("nia oh").unwrap().shop_days_present, 1);
    assert!(out.stats_issues.is_empty());
}

#[test]
fn shop_days_without_a_submission_are_absent_no_entry() {
    let doc = current(&[
        shop("Oz", "Pym", "10/2/2024 15:00:00", "Present"),
        volunteer("Pia", "Qu", "2"),
    ]);
    let out = ingest(&doc, &ShopCalendar::default(), SchemaChoice::Detect);
    let oz: Vec<Checked<AttendanceStatus>> = out.attendance["oz pym"]
        .iter()
        .map(|d| d.status.clone())
        .collect();
    assert_eq!(
        oz,
        vec![
            Checked::Known(AttendanceStatus::AbsentNoEntry),
            Checked::Known(AttendanceStatus::Present),
            Checked::Known(AttendanceStatus::AbsentNoEntry),
        ]
    );
    assert!(out.attendance["pia qu"].iter().all(|d| d.is_missed()));
}

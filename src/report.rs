use crate::dates::date_key;
use crate::model::{Column, CompleteRecord};
use crate::pipeline::Ingestion;
use anyhow::{Context, Result};
use csv::Writer;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::{Path, PathBuf};

pub fn output_path(input: &Path, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| {
        let mut out: PathBuf = input.into();
        out.set_extension("xlsx");
        out
    })
}

struct ReportFormats {
    title: Format,
    header: Format,
    cell: Format,
    left_text: Format,
    number: Format,
}

impl ReportFormats {
    fn new() -> Self {
        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(16)
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::VerticalCenter),
            header: Format::new()
                .set_bold()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
            cell: Format::new()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            left_text: Format::new()
                .set_align(FormatAlign::Left)
                .set_border(FormatBorder::Thin)
                .set_text_wrap()
                .set_align(FormatAlign::VerticalCenter),
            number: Format::new()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center)
                .set_num_format("0.##"),
        }
    }
}

fn write_title(ws: &mut Worksheet, title: &str, width: u16, fmt: &ReportFormats) -> Result<u32> {
    ws.set_row_height(0, 24)?;
    ws.merge_range(0, 0, 0, width - 1, title, &fmt.title)?;
    Ok(1)
}

fn write_headers(ws: &mut Worksheet, row: u32, headers: &[&str], fmt: &Format) -> Result<()> {
    for (i, h) in headers.iter().enumerate() {
        ws.write_string_with_format(row, i as u16, *h, fmt)?;
    }
    Ok(())
}

fn set_column_widths(ws: &mut Worksheet, widths: &[f64]) -> Result<()> {
    for (col, w) in widths.iter().enumerate() {
        ws.set_column_width(col as u16, *w)?;
    }
    Ok(())
}

/// Numbers go in as numbers; NaN and infinities as text so the cell stays readable.
fn write_hours(ws: &mut Worksheet, row: u32, col: u16, hours: f64, fmt: &ReportFormats) -> Result<()> {
    if hours.is_finite() {
        ws.write_number_with_format(row, col, hours, &fmt.number)?;
    } else {
        ws.write_string_with_format(row, col, hours.to_string(), &fmt.cell)?;
    }
    Ok(())
}

fn write_students(ws: &mut Worksheet, ingestion: &Ingestion, fmt: &ReportFormats) -> Result<()> {
    let headers = [
        "Student",
        "Volunteer hours",
        "Shop days present",
        "Missed shop days",
    ];
    let mut row = write_title(ws, "Per-student summary", headers.len() as u16, fmt)?;
    write_headers(ws, row, &headers, &fmt.header)?;
    row += 1;

    for (student, stats) in ingestion.stats.iter() {
        let missed = ingestion
            .attendance
            .get(student)
            .map(|days| {
                days.iter()
                    .filter(|d| d.is_missed())
                    .map(|d| d.date.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        ws.write_string_with_format(row, 0, student, &fmt.left_text)?;
        write_hours(ws, row, 1, stats.volunteer_hours, fmt)?;
        ws.write_number_with_format(row, 2, stats.shop_days_present as f64, &fmt.cell)?;
        ws.write_string_with_format(row, 3, missed, &fmt.left_text)?;
        row += 1;
    }
    set_column_widths(ws, &[24.0, 16.0, 18.0, 40.0])
}

fn write_issues(ws: &mut Worksheet, issues: &[String], fmt: &ReportFormats) -> Result<()> {
    let mut row = write_title(ws, "Ingestion issues", 2, fmt)?;
    write_headers(ws, row, &["#", "Issue"], &fmt.header)?;
    row += 1;
    for (i, issue) in issues.iter().enumerate() {
        ws.write_number_with_format(row, 0, (i + 1) as f64, &fmt.cell)?;
        ws.write_string_with_format(row, 1, issue, &fmt.left_text)?;
        row += 1;
    }
    set_column_widths(ws, &[6.0, 100.0])
}

fn write_stats_issues(ws: &mut Worksheet, ingestion: &Ingestion, fmt: &ReportFormats) -> Result<()> {
    let headers = ["Student", "Date", "Issue"];
    let mut row = write_title(ws, "Shop day issues", headers.len() as u16, fmt)?;
    write_headers(ws, row, &headers, &fmt.header)?;
    row += 1;
    for issue in &ingestion.stats_issues {
        ws.write_string_with_format(row, 0, &issue.student, &fmt.left_text)?;
        ws.write_string_with_format(row, 1, &issue.date, &fmt.cell)?;
        ws.write_string_with_format(row, 2, issue.issue.to_string(), &fmt.left_text)?;
        row += 1;
    }
    set_column_widths(ws, &[24.0, 14.0, 28.0])
}

fn write_attendance(ws: &mut Worksheet, ingestion: &Ingestion, fmt: &ReportFormats) -> Result<()> {
    let headers = ["Student", "Date", "Status"];
    let mut row = write_title(ws, "Shop day attendance", headers.len() as u16, fmt)?;
    write_headers(ws, row, &headers, &fmt.header)?;
    row += 1;
    for (student, days) in &ingestion.attendance {
        for day in days {
            ws.write_string_with_format(row, 0, student, &fmt.left_text)?;
            ws.write_string_with_format(row, 1, &day.date, &fmt.cell)?;
            ws.write_string_with_format(row, 2, day.status.to_string(), &fmt.cell)?;
            row += 1;
        }
    }
    set_column_widths(ws, &[24.0, 14.0, 18.0])
}

fn write_record_row(ws: &mut Worksheet, row: u32, r: &CompleteRecord, fmt: &ReportFormats) -> Result<()> {
    let cell = |v: &Option<String>| v.clone().unwrap_or_default();
    ws.write_string_with_format(row, 0, &r.merge_name, &fmt.left_text)?;
    ws.write_string_with_format(row, 1, date_key(r.day_submitted), &fmt.cell)?;
    ws.write_string_with_format(row, 2, r.regarding.to_string(), &fmt.left_text)?;
    ws.write_string_with_format(row, 3, r.attendance_status.to_string(), &fmt.cell)?;
    ws.write_string_with_format(row, 4, cell(&r.basic.hours), &fmt.cell)?;
    ws.write_string_with_format(row, 5, cell(&r.basic.selected_date), &fmt.cell)?;
    ws.write_string_with_format(row, 6, cell(&r.basic.timestamp), &fmt.cell)?;
    Ok(())
}

fn write_records(ws: &mut Worksheet, records: &[CompleteRecord], fmt: &ReportFormats) -> Result<()> {
    let headers = [
        "Student",
        Column::DaySubmitted.header(),
        "Regarding",
        "Attendance",
        "Hours",
        "Selected date",
        Column::Timestamp.header(),
    ];
    let mut row = write_title(ws, "Records", headers.len() as u16, fmt)?;
    write_headers(ws, row, &headers, &fmt.header)?;
    row += 1;
    for r in records {
        write_record_row(ws, row, r, fmt)?;
        row += 1;
    }
    set_column_widths(ws, &[24.0, 14.0, 40.0, 12.0, 8.0, 14.0, 20.0])
}

pub fn write_workbook(ingestion: &Ingestion, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let fmt = ReportFormats::new();

    write_students(workbook.add_worksheet().set_name("Students")?, ingestion, &fmt)?;
    write_issues(workbook.add_worksheet().set_name("Issues")?, &ingestion.issues, &fmt)?;
    write_stats_issues(
        workbook.add_worksheet().set_name("Shop day issues")?,
        ingestion,
        &fmt,
    )?;
    write_attendance(
        workbook.add_worksheet().set_name("Attendance")?,
        ingestion,
        &fmt,
    )?;
    write_records(
        workbook.add_worksheet().set_name("Records")?,
        &ingestion.records,
        &fmt,
    )?;

    workbook
        .save(path)
        .with_context(|| format!("cannot write report {}", path.display()))?;
    Ok(())
}

/// Writes the shop day issues as `student,date,issue` rows.
pub fn write_stats_issues_csv(ingestion: &Ingestion, path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    for issue in &ingestion.stats_issues {
        wtr.serialize(issue)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_attendance_csv(ingestion: &Ingestion, path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    wtr.write_record(["student", "date", "status"])?;
    for (student, days) in &ingestion.attendance {
        for day in days {
            let status = day.status.to_string();
            wtr.write_record([student.as_str(), day.date.as_str(), status.as_str()])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

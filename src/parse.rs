use crate::model::RawRecord;
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    FieldMismatch,
    Csv,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseErrorKind::FieldMismatch => "FieldMismatch",
            ParseErrorKind::Csv => "Csv",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub row: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]({}): {}", self.kind, self.row, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    pub fields: Option<Vec<String>>,
    pub records: Vec<RawRecord>,
    pub errors: Vec<ParseError>,
}

/// Reads header-keyed records from sanitized text.
///
/// Empty lines are skipped. Short rows keep the cells they have and long rows
/// drop the surplus; both are reported, neither stops the parse.
pub fn parse_document(text: &str) -> ParsedDocument {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut doc = ParsedDocument::default();
    let headers = match rdr.headers() {
        Ok(h) if !h.is_empty() => h.clone(),
        Ok(_) => return doc,
        Err(e) => {
            doc.errors.push(ParseError {
                kind: ParseErrorKind::Csv,
                row: 0,
                message: e.to_string(),
            });
            return doc;
        }
    };
    let names = dedupe_headers(&headers);
    if headers.iter().all(|h| h.trim().is_empty()) {
        log::warn!("header row has no named columns");
    } else {
        doc.fields = Some(names.clone());
    }

    for (row, result) in rdr.records().enumerate() {
        match result {
            Ok(record) => {
                if let Some(err) = width_mismatch(&headers, &record, row) {
                    doc.errors.push(err);
                }
                doc.records.push(to_raw(&names, &record));
            }
            Err(e) => {
                log::debug!("skipping unreadable row {row}: {e}");
                doc.errors.push(ParseError {
                    kind: ParseErrorKind::Csv,
                    row,
                    message: e.to_string(),
                });
            }
        }
    }

    log::info!(
        "parsed {} rows across {} columns ({} parse errors)",
        doc.records.len(),
        headers.len(),
        doc.errors.len()
    );
    doc
}

fn width_mismatch(headers: &StringRecord, record: &StringRecord, row: usize) -> Option<ParseError> {
    let (expected, parsed) = (headers.len(), record.len());
    let label = match parsed.cmp(&expected) {
        std::cmp::Ordering::Less => "Too few fields",
        std::cmp::Ordering::Greater => "Too many fields",
        std::cmp::Ordering::Equal => return None,
    };
    Some(ParseError {
        kind: ParseErrorKind::FieldMismatch,
        row,
        message: format!("{label}: expected {expected} fields but parsed {parsed}"),
    })
}

fn dedupe_headers(headers: &StringRecord) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .iter()
        .map(|h| {
            let mut name = h.to_string();
            let mut n = 0;
            while !seen.insert(name.clone()) {
                n += 1;
                name = format!("{h}_{n}");
            }
            if n > 0 {
                log::warn!("duplicate header {h:?} renamed to {name:?}");
            }
            name
        })
        .collect()
}

fn to_raw(names: &[String], record: &StringRecord) -> RawRecord {
    names
        .iter()
        .zip(record.iter())
        .map(|(h, v)| (h.clone(), v.to_string()))
        .collect()
}

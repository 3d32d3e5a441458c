use crate::calendar::ShopCalendar;
use crate::schema::SchemaVersion;
use anyhow::Result;
use csv::Writer;
use std::path::{Path, PathBuf};

fn with_csv_extension(filename: &str) -> PathBuf {
    if filename.ends_with(".csv") {
        PathBuf::from(filename)
    } else {
        PathBuf::from(format!("{filename}.csv"))
    }
}

/// Creates an empty export with the schema's header row. Returns the path written.
pub fn write_template(filename: &str, schema: SchemaVersion) -> Result<PathBuf> {
    let path = with_csv_extension(filename);
    let mut wtr = Writer::from_path(&path)?;
    wtr.write_record(schema.columns())?;
    wtr.flush()?;
    log::debug!("wrote {schema:?} template to {}", path.display());
    Ok(path)
}

pub fn write_calendar_template(path: &Path) -> Result<()> {
    ShopCalendar::default().save(path)
}

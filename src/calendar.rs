use anyhow::{Context, Result};
use csv::{ReaderBuilder, Writer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize, Serialize)]
struct ShopDateRecord {
    date: String,
    is_shop_day: bool,
}

/// Which dates (`YYYY-MM-DD`) are designated shop days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopCalendar {
    days: BTreeMap<String, bool>,
}

impl Default for ShopCalendar {
    fn default() -> Self {
        ["2024-10-01", "2024-10-02", "2024-10-03"]
            .into_iter()
            .map(|d| (d.to_string(), true))
            .collect()
    }
}

impl FromIterator<(String, bool)> for ShopCalendar {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

impl ShopCalendar {
    pub fn empty() -> Self {
        Self {
            days: BTreeMap::new(),
        }
    }

    pub fn is_shop_day(&self, date_key: &str) -> bool {
        self.days.get(date_key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, date_key: impl Into<String>, is_shop_day: bool) {
        self.days.insert(date_key.into(), is_shop_day);
    }

    pub fn shop_days(&self) -> impl Iterator<Item = &str> {
        self.days
            .iter()
            .filter(|(_, on)| **on)
            .map(|(d, _)| d.as_str())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("cannot open shop calendar {}", path.display()))?;
        let mut calendar = Self::empty();
        for result in rdr.deserialize() {
            let r: ShopDateRecord =
                result.with_context(|| format!("bad row in shop calendar {}", path.display()))?;
            calendar.set(r.date, r.is_shop_day);
        }
        log::info!(
            "loaded {} shop days from {}",
            calendar.shop_days().count(),
            path.display()
        );
        Ok(calendar)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut wtr = Writer::from_path(path.as_ref())?;
        for (date, on) in &self.days {
            wtr.serialize(ShopDateRecord {
                date: date.clone(),
                is_shop_day: *on,
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}

use crate::model::{CompleteRecord, Regarding, StudentStats};
use crate::validate::coerce_number;
use std::collections::HashMap;

/// Per-student totals, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentStatsMap {
    students: Vec<(String, StudentStats)>,
    index: HashMap<String, usize>,
}

impl StudentStatsMap {
    pub fn get(&self, merge_name: &str) -> Option<&StudentStats> {
        self.index.get(merge_name).map(|&i| &self.students[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StudentStats)> {
        self.students.iter().map(|(name, stats)| (name.as_str(), stats))
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    fn entry(&mut self, merge_name: &str) -> &mut StudentStats {
        let i = match self.index.get(merge_name) {
            Some(&i) => i,
            None => {
                self.students
                    .push((merge_name.to_string(), StudentStats::default()));
                self.index
                    .insert(merge_name.to_string(), self.students.len() - 1);
                self.students.len() - 1
            }
        };
        &mut self.students[i].1
    }

    fn add(&mut self, record: &CompleteRecord) {
        let stats = self.entry(&record.merge_name);
        match record.regarding.known() {
            // counted whatever the attendance status says
            Some(Regarding::ShopHours) => {
                stats.shop_days_present += 1;
                stats.shop_day_entries.push(record.clone());
            }
            // bad hours turn the total into NaN
            Some(Regarding::VolunteerHours) => {
                stats.volunteer_hours += coerce_number(record.basic.hours.as_deref());
            }
            Some(Regarding::SponsorFundraising) | None => {}
        }
    }
}

/// Folds the records, in order, into per-student totals.
pub fn aggregate(records: &[CompleteRecord]) -> StudentStatsMap {
    let mut map = StudentStatsMap::default();
    for record in records {
        map.add(record);
    }
    log::info!(
        "aggregated {} records into {} students",
        records.len(),
        map.len()
    );
    map
}

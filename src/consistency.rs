use crate::aggregate::StudentStatsMap;
use crate::calendar::ShopCalendar;
use crate::dates::date_key;
use crate::model::{AttendanceStatus, Checked, ShopDayAttendance, StatsIssue, StatsIssueKind};
use std::collections::{BTreeMap, HashMap, HashSet};

pub const MAX_STATS_ISSUES: usize = 50;

/// Finds repeated same-day shop entries and entries on non-shop days.
///
/// Students and entries are walked in record order; both checks may fire for
/// one entry. Stops once [`MAX_STATS_ISSUES`] issues are collected.
pub fn check_shop_days(stats: &StudentStatsMap, calendar: &ShopCalendar) -> Vec<StatsIssue> {
    let mut issues = Vec::new();
    for (student, student_stats) in stats.iter() {
        let mut seen = HashSet::new();
        for entry in &student_stats.shop_day_entries {
            let date = date_key(entry.day_submitted);
            let duplicate = !seen.insert(date.clone());
            let off_calendar = !calendar.is_shop_day(&date);
            for (fired, issue) in [
                (duplicate, StatsIssueKind::DuplicateEntry),
                (off_calendar, StatsIssueKind::NonShopDay),
            ] {
                if !fired {
                    continue;
                }
                if issues.len() == MAX_STATS_ISSUES {
                    log::warn!("stopped after {MAX_STATS_ISSUES} shop day issues");
                    return issues;
                }
                issues.push(StatsIssue {
                    student: student.to_string(),
                    date: date.clone(),
                    issue,
                });
            }
        }
    }
    issues
}

/// Each student's status on every designated shop day, in calendar order.
///
/// A day is taken from the student's first shop-hours entry on that date; days
/// with no entry at all are `Absent (no entry)`.
pub fn shop_day_attendance(
    stats: &StudentStatsMap,
    calendar: &ShopCalendar,
) -> BTreeMap<String, Vec<ShopDayAttendance>> {
    let mut attendance = BTreeMap::new();
    for (student, student_stats) in stats.iter() {
        let mut by_date = HashMap::new();
        for entry in &student_stats.shop_day_entries {
            by_date
                .entry(date_key(entry.day_submitted))
                .or_insert(&entry.attendance_status);
        }
        let days = calendar
            .shop_days()
            .map(|date| ShopDayAttendance {
                date: date.to_string(),
                status: by_date
                    .get(date)
                    .map_or(Checked::Known(AttendanceStatus::AbsentNoEntry), |s| {
                        (*s).clone()
                    }),
            })
            .collect();
        attendance.insert(student.to_string(), days);
    }
    attendance
}

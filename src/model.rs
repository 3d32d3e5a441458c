use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

pub type RawRecord = HashMap<String, String>;

/// Header text is byte-for-byte what the form exports, stray spaces included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    VolunteerHours,
    Timestamp,
    DaySubmitted,
    FirstName,
    LastName,
    MergeName,
    FullName,
    Sector,
    ReviewedHandbook,
    Regarding,
    TeamHosted,
    Hours,
    HelpDesc,
    Competition,
    AttendanceStatus,
    Picture,
    PostedInChannel,
    SituationCategory,
    PreventionDesc,
    TeamHelpDesc,
    DonationMethod,
    DonorName,
    DonationAmount,
    Column20,
    SelectedDate,
}

impl Column {
    pub const SOURCE: [Column; 24] = [
        Column::VolunteerHours,
        Column::Timestamp,
        Column::FirstName,
        Column::LastName,
        Column::MergeName,
        Column::FullName,
        Column::Sector,
        Column::ReviewedHandbook,
        Column::Regarding,
        Column::TeamHosted,
        Column::Hours,
        Column::HelpDesc,
        Column::Competition,
        Column::AttendanceStatus,
        Column::Picture,
        Column::PostedInChannel,
        Column::SituationCategory,
        Column::PreventionDesc,
        Column::TeamHelpDesc,
        Column::DonationMethod,
        Column::DonorName,
        Column::DonationAmount,
        Column::Column20,
        Column::SelectedDate,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::VolunteerHours => "Volunteer Hours",
            Column::Timestamp => "Timestamp",
            Column::DaySubmitted => "Day Submitted",
            Column::FirstName => "First Name",
            Column::LastName => "Last Name",
            Column::MergeName => "Merge Name",
            Column::FullName => "Full Name",
            Column::Sector => "Which sector are you apart of?",
            Column::ReviewedHandbook => "I have already reviewed the student handbook. ",
            Column::Regarding => "This is in regards to:",
            Column::TeamHosted => {
                "What team hosted  (TRF, FTC, or FLL)  event / outreach is this for?"
            }
            Column::Hours => "How many hours did you clock?",
            Column::HelpDesc => "How did You help with this event / outreach?",
            Column::Competition => "What competition is this for?",
            Column::AttendanceStatus => "What is the status of your attendance for this date?",
            Column::Picture => "Upload picture with two other Argo students or mentors",
            Column::PostedInChannel => {
                "I have posted in the attendance channel (tagging One mentor and One Captain from my department):"
            }
            Column::SituationCategory => {
                "Which of these categories does your situation fall under?"
            }
            Column::PreventionDesc => "How do we prevent this from happening again? ",
            Column::TeamHelpDesc => "Is there anything the team can do to help you?",
            Column::DonationMethod => "How was this donation given:",
            Column::DonorName => {
                "Who was the name of the donor (First and Last name or Company Name):"
            }
            Column::DonationAmount => "How much did they donate?",
            Column::Column20 => "Column 20",
            Column::SelectedDate => "Which day is this for?",
        }
    }

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::AttendanceStatus => &[LEGACY_ATTENDANCE_HEADER],
            _ => &[],
        }
    }
}

pub const LEGACY_ATTENDANCE_HEADER: &str = "What is the status of your attendance today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regarding {
    VolunteerHours,
    ShopHours,
    SponsorFundraising,
}

impl Regarding {
    pub const ALL: [Regarding; 3] = [
        Regarding::VolunteerHours,
        Regarding::ShopHours,
        Regarding::SponsorFundraising,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Regarding::VolunteerHours => {
                "Volunteer hours (team hosted event including Helping at Competition / outreach)"
            }
            Regarding::ShopHours => "Shop hours",
            Regarding::SponsorFundraising => "Sponsor/Fundraising",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

impl fmt::Display for Regarding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttendanceStatus {
    Absent,
    Present,
    Approved,
    /// Never read from a row; marks a shop day with no submission at all.
    AbsentNoEntry,
}

impl AttendanceStatus {
    pub const SUBMITTED: [AttendanceStatus; 3] = [
        AttendanceStatus::Absent,
        AttendanceStatus::Present,
        AttendanceStatus::Approved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Approved => "APPROVED",
            AttendanceStatus::AbsentNoEntry => "Absent (no entry)",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::SUBMITTED.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cell promoted to a closed set only after a membership check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checked<T> {
    Known(T),
    Unrecognized(String),
}

impl<T: Copy> Checked<T> {
    pub fn known(&self) -> Option<T> {
        match self {
            Checked::Known(v) => Some(*v),
            Checked::Unrecognized(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Checked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Checked::Known(v) => v.fmt(f),
            Checked::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// One submission, every cell as received. `None` means the column was absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BasicRecord {
    #[serde(rename = "Volunteer Hours", deserialize_with = "cell")]
    pub volunteer_hours: Option<String>,
    #[serde(rename = "Timestamp", deserialize_with = "cell")]
    pub timestamp: Option<String>,
    #[serde(rename = "First Name", deserialize_with = "cell")]
    pub first_name: Option<String>,
    #[serde(rename = "Last Name", deserialize_with = "cell")]
    pub last_name: Option<String>,
    #[serde(rename = "Merge Name", deserialize_with = "cell")]
    pub merge_name: Option<String>,
    #[serde(rename = "Full Name", deserialize_with = "cell")]
    pub full_name: Option<String>,
    #[serde(rename = "Which sector are you apart of?", deserialize_with = "cell")]
    pub sector: Option<String>,
    #[serde(rename = "I have already reviewed the student handbook. ", deserialize_with = "cell")]
    pub reviewed_handbook: Option<String>,
    #[serde(rename = "This is in regards to:", deserialize_with = "cell")]
    pub regarding: Option<String>,
    #[serde(
        rename = "What team hosted  (TRF, FTC, or FLL)  event / outreach is this for?",
        deserialize_with = "cell"
    )]
    pub team_hosted: Option<String>,
    #[serde(rename = "How many hours did you clock?", deserialize_with = "cell")]
    pub hours: Option<String>,
    #[serde(rename = "How did You help with this event / outreach?", deserialize_with = "cell")]
    pub help_desc: Option<String>,
    #[serde(rename = "What competition is this for?", deserialize_with = "cell")]
    pub competition: Option<String>,
    #[serde(
        rename = "What is the status of your attendance for this date?",
        alias = "What is the status of your attendance today?",
        deserialize_with = "cell"
    )]
    pub attendance_status: Option<String>,
    #[serde(
        rename = "Upload picture with two other Argo students or mentors",
        deserialize_with = "cell"
    )]
    pub picture: Option<String>,
    #[serde(
        rename = "I have posted in the attendance channel (tagging One mentor and One Captain from my department):",
        deserialize_with = "cell"
    )]
    pub posted_in_channel: Option<String>,
    #[serde(
        rename = "Which of these categories does your situation fall under?",
        deserialize_with = "cell"
    )]
    pub situation_category: Option<String>,
    #[serde(rename = "How do we prevent this from happening again? ", deserialize_with = "cell")]
    pub prevention_desc: Option<String>,
    #[serde(rename = "Is there anything the team can do to help you?", deserialize_with = "cell")]
    pub team_help_desc: Option<String>,
    #[serde(rename = "How was this donation given:", deserialize_with = "cell")]
    pub donation_method: Option<String>,
    #[serde(
        rename = "Who was the name of the donor (First and Last name or Company Name):",
        deserialize_with = "cell"
    )]
    pub donor_name: Option<String>,
    #[serde(rename = "How much did they donate?", deserialize_with = "cell")]
    pub donation_amount: Option<String>,
    #[serde(rename = "Column 20", deserialize_with = "cell")]
    pub column20: Option<String>,
    // blank means the student skipped it, same as an old row without the column
    #[serde(rename = "Which day is this for?", deserialize_with = "non_blank")]
    pub selected_date: Option<String>,
}

fn cell<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    String::deserialize(d).map(Some)
}

fn non_blank<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    String::deserialize(d).map(|v| Some(v).filter(|v| !v.is_empty()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompleteRecord {
    pub basic: BasicRecord,
    pub merge_name: String,
    pub regarding: Checked<Regarding>,
    pub attendance_status: Checked<AttendanceStatus>,
    pub day_submitted: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentStats {
    pub volunteer_hours: f64,
    pub shop_days_present: u32,
    pub shop_day_entries: Vec<CompleteRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatsIssueKind {
    #[serde(rename = "Duplicate entry")]
    DuplicateEntry,
    #[serde(rename = "Entry on a non-shop day")]
    NonShopDay,
}

impl fmt::Display for StatsIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatsIssueKind::DuplicateEntry => "Duplicate entry",
            StatsIssueKind::NonShopDay => "Entry on a non-shop day",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsIssue {
    pub student: String,
    pub date: String,
    pub issue: StatsIssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopDayAttendance {
    pub date: String,
    pub status: Checked<AttendanceStatus>,
}

impl ShopDayAttendance {
    pub fn is_missed(&self) -> bool {
        self.status == Checked::Known(AttendanceStatus::AbsentNoEntry)
    }
}

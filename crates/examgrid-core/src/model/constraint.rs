//! Institutional constraint categories and entries

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::GridError;

/// Whether a category's items are period indices or venue codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Period,
    Venue,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Period => write!(f, "period"),
            ConstraintKind::Venue => write!(f, "venue"),
        }
    }
}

/// The ten constraint categories
///
/// Serialized under the short keys the snapshot record uses on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConstraintCategory {
    #[serde(rename = "periodIncE")]
    PeriodInclusiveExam,
    #[serde(rename = "periodExcE")]
    PeriodExclusiveExam,
    #[serde(rename = "venueIncE")]
    VenueInclusiveExam,
    #[serde(rename = "venueExcE")]
    VenueExclusiveExam,
    #[serde(rename = "periodIncV")]
    PeriodInclusiveVenue,
    #[serde(rename = "periodExcV")]
    PeriodExclusiveVenue,
    #[serde(rename = "examWAftE")]
    ExamAfterExam,
    #[serde(rename = "examExcE")]
    ExamExclusiveExam,
    #[serde(rename = "examWCoinE")]
    ExamCoincidence,
    #[serde(rename = "frontLE")]
    FrontLoadedExam,
}

impl ConstraintCategory {
    pub const ALL: [ConstraintCategory; 10] = [
        ConstraintCategory::PeriodInclusiveExam,
        ConstraintCategory::PeriodExclusiveExam,
        ConstraintCategory::VenueInclusiveExam,
        ConstraintCategory::VenueExclusiveExam,
        ConstraintCategory::PeriodInclusiveVenue,
        ConstraintCategory::PeriodExclusiveVenue,
        ConstraintCategory::ExamAfterExam,
        ConstraintCategory::ExamExclusiveExam,
        ConstraintCategory::ExamCoincidence,
        ConstraintCategory::FrontLoadedExam,
    ];

    /// Item kind the category stores
    ///
    /// Only the period-based categories carry period indices; the exam
    /// relation categories and front-loading carry codes.
    pub fn kind(&self) -> ConstraintKind {
        match self {
            ConstraintCategory::PeriodInclusiveExam
            | ConstraintCategory::PeriodExclusiveExam
            | ConstraintCategory::PeriodInclusiveVenue
            | ConstraintCategory::PeriodExclusiveVenue => ConstraintKind::Period,
            _ => ConstraintKind::Venue,
        }
    }

    /// Short key used in stored snapshot records
    pub fn wire_key(&self) -> &'static str {
        match self {
            ConstraintCategory::PeriodInclusiveExam => "periodIncE",
            ConstraintCategory::PeriodExclusiveExam => "periodExcE",
            ConstraintCategory::VenueInclusiveExam => "venueIncE",
            ConstraintCategory::VenueExclusiveExam => "venueExcE",
            ConstraintCategory::PeriodInclusiveVenue => "periodIncV",
            ConstraintCategory::PeriodExclusiveVenue => "periodExcV",
            ConstraintCategory::ExamAfterExam => "examWAftE",
            ConstraintCategory::ExamExclusiveExam => "examExcE",
            ConstraintCategory::ExamCoincidence => "examWCoinE",
            ConstraintCategory::FrontLoadedExam => "frontLE",
        }
    }

    /// Kebab-case name used on the command line and in logs
    pub fn slug(&self) -> &'static str {
        match self {
            ConstraintCategory::PeriodInclusiveExam => "period-inclusive-exam",
            ConstraintCategory::PeriodExclusiveExam => "period-exclusive-exam",
            ConstraintCategory::VenueInclusiveExam => "venue-inclusive-exam",
            ConstraintCategory::VenueExclusiveExam => "venue-exclusive-exam",
            ConstraintCategory::PeriodInclusiveVenue => "period-inclusive-venue",
            ConstraintCategory::PeriodExclusiveVenue => "period-exclusive-venue",
            ConstraintCategory::ExamAfterExam => "exam-after-exam",
            ConstraintCategory::ExamExclusiveExam => "exam-exclusive-exam",
            ConstraintCategory::ExamCoincidence => "exam-coincidence",
            ConstraintCategory::FrontLoadedExam => "front-loaded-exam",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConstraintCategory::PeriodInclusiveExam => "Period Inclusive (Exams)",
            ConstraintCategory::PeriodExclusiveExam => "Period Exclusive (Exams)",
            ConstraintCategory::VenueInclusiveExam => "Venue Inclusive (Exams)",
            ConstraintCategory::VenueExclusiveExam => "Venue Exclusive (Exams)",
            ConstraintCategory::PeriodInclusiveVenue => "Period Inclusive (Venues)",
            ConstraintCategory::PeriodExclusiveVenue => "Period Exclusive (Venues)",
            ConstraintCategory::ExamAfterExam => "Exam After Exam",
            ConstraintCategory::ExamExclusiveExam => "Exam Exclusive",
            ConstraintCategory::ExamCoincidence => "Exam Coincidence",
            ConstraintCategory::FrontLoadedExam => "Front-Loaded Exams",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConstraintCategory::PeriodInclusiveExam => {
                "Exams that may only be scheduled in the listed periods"
            }
            ConstraintCategory::PeriodExclusiveExam => {
                "Exams that must not be scheduled in the listed periods"
            }
            ConstraintCategory::VenueInclusiveExam => {
                "Exams that may only be held in the listed venues"
            }
            ConstraintCategory::VenueExclusiveExam => {
                "Exams that must not be held in the listed venues"
            }
            ConstraintCategory::PeriodInclusiveVenue => {
                "Venues available only in the listed periods"
            }
            ConstraintCategory::PeriodExclusiveVenue => {
                "Venues unavailable in the listed periods"
            }
            ConstraintCategory::ExamAfterExam => "Exams that must follow the listed exams",
            ConstraintCategory::ExamExclusiveExam => {
                "Exams that must not share a period with the listed exams"
            }
            ConstraintCategory::ExamCoincidence => {
                "Exams that must share a period with the listed exams"
            }
            ConstraintCategory::FrontLoadedExam => {
                "Exams to schedule early, listed with their venues"
            }
        }
    }

    pub fn from_wire_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.wire_key() == key)
    }
}

impl fmt::Display for ConstraintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ConstraintCategory {
    type Err = GridError;

    /// Accepts either the slug or the wire key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.slug() == s || c.wire_key() == s)
            .ok_or_else(|| GridError::Serialization {
                message: format!("unknown constraint category: {s}"),
            })
    }
}

/// Items of one entry; exactly one list is populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintItems {
    Periods(Vec<u32>),
    Venues(Vec<String>),
}

impl ConstraintItems {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            ConstraintItems::Periods(_) => ConstraintKind::Period,
            ConstraintItems::Venues(_) => ConstraintKind::Venue,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ConstraintItems::Periods(p) => p.len(),
            ConstraintItems::Venues(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items rendered as strings, in stored order
    pub fn to_strings(&self) -> Vec<String> {
        match self {
            ConstraintItems::Periods(p) => p.iter().map(|i| i.to_string()).collect(),
            ConstraintItems::Venues(v) => v.clone(),
        }
    }

    /// An empty list of the given kind
    pub fn empty(kind: ConstraintKind) -> Self {
        match kind {
            ConstraintKind::Period => ConstraintItems::Periods(Vec::new()),
            ConstraintKind::Venue => ConstraintItems::Venues(Vec::new()),
        }
    }
}

/// One course (or venue) line within a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintEntry {
    pub course_code: String,
    #[serde(flatten)]
    pub items: ConstraintItems,
}

impl ConstraintEntry {
    pub fn periods(course_code: impl Into<String>, periods: Vec<u32>) -> Self {
        Self {
            course_code: course_code.into(),
            items: ConstraintItems::Periods(periods),
        }
    }

    pub fn venues(course_code: impl Into<String>, venues: Vec<String>) -> Self {
        Self {
            course_code: course_code.into(),
            items: ConstraintItems::Venues(venues),
        }
    }

    pub fn kind(&self) -> ConstraintKind {
        self.items.kind()
    }

    pub fn period_list(&self) -> &[u32] {
        match &self.items {
            ConstraintItems::Periods(p) => p,
            ConstraintItems::Venues(_) => &[],
        }
    }
}

/// A constraint snapshot as stored: one encoded string per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintSnapshotRecord {
    pub id: i64,
    pub name: String,
    pub date: DateTime<Utc>,
    pub created_by: String,
    pub encoded: BTreeMap<ConstraintCategory, String>,
}

/// A constraint snapshot decoded into structured entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintSnapshot {
    pub id: i64,
    pub name: String,
    pub date: DateTime<Utc>,
    pub created_by: String,
    pub entries: BTreeMap<ConstraintCategory, Vec<ConstraintEntry>>,
}

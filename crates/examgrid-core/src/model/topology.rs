//! Session topology: the grid shape and date range of one academic session

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{GridError, Result};

pub const DEFAULT_DAYS_PER_WEEK: u8 = 5;
pub const DEFAULT_PERIODS_PER_DAY: u32 = 3;
pub const DEFAULT_EXAM_WEEKS: u32 = 2;
/// Upper bound on `days_inclusive * periods_per_day` for one session
pub const MAX_CALENDAR_SLOTS: u64 = 100_000;

/// Number of calendar weeks touched by an inclusive date range
///
/// `ceil(days_inclusive / 7)`; zero when the range is inverted.
pub fn exam_weeks_for(start_date: NaiveDate, end_date: NaiveDate) -> u32 {
    if end_date < start_date {
        return 0;
    }
    let days = (end_date - start_date).num_days() + 1;
    ((days + 6) / 7) as u32
}

/// Full topology consumed by the period mapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topology {
    pub days_per_week: u8,
    pub periods_per_day: u32,
    /// Derived from the date range; see [`exam_weeks_for`]
    pub exam_weeks: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Topology {
    /// Build a topology, deriving `exam_weeks` from the date range
    pub fn new(
        days_per_week: u8,
        periods_per_day: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            days_per_week,
            periods_per_day,
            exam_weeks: exam_weeks_for(start_date, end_date),
            start_date,
            end_date,
        }
    }

    /// Replace the date range and recompute `exam_weeks`
    pub fn with_dates(mut self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self.exam_weeks = exam_weeks_for(start_date, end_date);
        self
    }

    /// Inclusive day count of the session; zero when inverted
    pub fn days_inclusive(&self) -> i64 {
        if self.end_date < self.start_date {
            0
        } else {
            (self.end_date - self.start_date).num_days() + 1
        }
    }

    /// # Errors
    ///
    /// `InvalidTopology` when the range is inverted, a grid dimension is
    /// out of bounds (`days_per_week` must be 1..=7, `periods_per_day` > 0),
    /// or the calendar could exceed `MAX_CALENDAR_SLOTS`.
    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(GridError::InvalidTopology {
                reason: format!(
                    "start date {} is after end date {}",
                    self.start_date, self.end_date
                ),
            });
        }
        if self.days_per_week == 0 || self.days_per_week > 7 {
            return Err(GridError::InvalidTopology {
                reason: format!("days per week must be 1..=7, got {}", self.days_per_week),
            });
        }
        if self.periods_per_day == 0 {
            return Err(GridError::InvalidTopology {
                reason: "periods per day must be positive".to_string(),
            });
        }
        let upper_bound = self.days_inclusive() as u64 * u64::from(self.periods_per_day);
        if upper_bound > MAX_CALENDAR_SLOTS {
            return Err(GridError::InvalidTopology {
                reason: format!(
                    "{} days of {} periods exceeds {MAX_CALENDAR_SLOTS} slots",
                    self.days_inclusive(),
                    self.periods_per_day
                ),
            });
        }
        Ok(())
    }

    pub fn grid_shape(&self) -> GridShape {
        GridShape {
            days_per_week: self.days_per_week,
            periods_per_day: self.periods_per_day,
            exam_weeks: self.exam_weeks,
        }
    }
}

/// Grid dimensions tracked by the institutional context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridShape {
    pub days_per_week: u8,
    pub periods_per_day: u32,
    pub exam_weeks: u32,
}

impl Default for GridShape {
    fn default() -> Self {
        Self {
            days_per_week: DEFAULT_DAYS_PER_WEEK,
            periods_per_day: DEFAULT_PERIODS_PER_DAY,
            exam_weeks: DEFAULT_EXAM_WEEKS,
        }
    }
}

/// A persisted session settings record (one version of the topology)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSettings {
    pub id: i64,
    pub description: Option<String>,
    /// Academic session label, e.g. `2024/2025`
    pub session: Option<String>,
    pub semester: Option<u8>,
    pub topology: Topology,
    pub created_at: DateTime<Utc>,
}

impl SessionSettings {
    /// Payload shape handed to the institutional context
    pub fn to_payload(&self) -> TopologyPayload {
        TopologyPayload {
            id: Some(self.id),
            description: self.description.clone(),
            session: self.session.clone(),
            semester: self.semester,
            days_per_week: Some(self.topology.days_per_week),
            periods_per_day: Some(self.topology.periods_per_day),
            exam_weeks: Some(self.topology.exam_weeks),
            start_date: Some(self.topology.start_date),
            end_date: Some(self.topology.end_date),
        }
    }
}

/// Input for appending a new session settings version
#[derive(Debug, Clone, PartialEq)]
pub struct NewSessionSettings {
    pub description: Option<String>,
    pub session: Option<String>,
    pub semester: Option<u8>,
    pub days_per_week: u8,
    pub periods_per_day: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewSessionSettings {
    pub fn topology(&self) -> Topology {
        Topology::new(
            self.days_per_week,
            self.periods_per_day,
            self.start_date,
            self.end_date,
        )
    }
}

/// Partial session settings as received from the topology provider
///
/// Absent fields leave the context's previous values in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopologyPayload {
    pub id: Option<i64>,
    pub description: Option<String>,
    pub session: Option<String>,
    pub semester: Option<u8>,
    pub days_per_week: Option<u8>,
    pub periods_per_day: Option<u32>,
    pub exam_weeks: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TopologyPayload {
    pub fn has_session(&self) -> bool {
        self.session
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn has_semester(&self) -> bool {
        self.semester.is_some()
    }
}

//! Duty Models (值日记录 / 延期队列)

use serde::{Deserialize, Serialize};

/// Duty record status
///
/// One-way transition: `Pending` → `Completed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum DutyStatus {
    #[default]
    Pending,
    Completed,
}

/// Daily duty assignment for one floor
///
/// At most one record exists per `(date, floor)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DutyRecord {
    pub id: i64,
    /// Business date (YYYY-MM-DD)
    pub date: String,
    pub floor: i64,
    pub room_number: i64,
    pub status: DutyStatus,
    pub confirmed_by: Option<String>,
    /// Unix millis
    pub confirmed_at: Option<i64>,
    pub created_at: i64,
}

impl DutyRecord {
    pub fn is_completed(&self) -> bool {
        self.status == DutyStatus::Completed
    }
}

/// Deferred room owing a makeup turn
///
/// `id` is the insertion sequence; the queue is served strictly by ascending id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct QueueEntry {
    pub id: i64,
    pub floor: i64,
    pub room_number: i64,
    pub reason: String,
    pub recorded_by: String,
    pub created_at: i64,
}

/// Duty record as shown to supervisors and in announcements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DutyView {
    #[serde(flatten)]
    pub record: DutyRecord,
    /// Rooms 1, 6, 7 and 12 of a floor do the general cleaning
    pub general_cleaning: bool,
}

/// Confirm payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutyConfirm {
    pub room_number: i64,
    /// Defaults to today
    pub date: Option<String>,
}

/// Skip payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutySkip {
    pub floor: i64,
    pub room_number: i64,
    pub reason: Option<String>,
}

/// Result of a skip: the queued debt and today's rewritten record (if any)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkipOutcome {
    pub queued: QueueEntry,
    /// Room that takes over today's duty
    pub next_room: i64,
    pub record: Option<DutyRecord>,
}

/// Daily duty report (completed vs pending)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DutyReport {
    pub date: String,
    pub completed: Vec<DutyRecord>,
    pub pending: Vec<DutyRecord>,
    /// `completed * 100 / total`, 0 when there are no records
    pub completion_percent: i64,
}

/// Dashboard counters for one day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DutyStats {
    pub date: String,
    pub total_duties: usize,
    pub completed: usize,
    pub pending: usize,
    pub completion_percent: i64,
    /// Size of the whole penalty log, not only today's
    pub total_penalties: i64,
}

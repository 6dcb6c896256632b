//! Attendance Model (考勤)

use serde::{Deserialize, Serialize};

/// Per-floor headcount for one date; the latest submission wins
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttendanceRecord {
    pub id: i64,
    /// YYYY-MM-DD
    pub date: String,
    pub floor: i64,
    pub student_count: i64,
    pub notes: Option<String>,
    pub submitted_by: String,
    pub submitted_at: i64,
}

/// Submit attendance payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSubmit {
    pub floor: i64,
    pub student_count: i64,
    pub notes: Option<String>,
    /// Defaults to today
    pub date: Option<String>,
}

/// Attendance summary for one date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendanceReport {
    pub date: String,
    pub records: Vec<AttendanceRecord>,
    pub total_students: i64,
    pub floors_submitted: usize,
    pub floors_registered: usize,
}

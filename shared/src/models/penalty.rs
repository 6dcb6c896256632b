//! Penalty Model (处罚)

use serde::{Deserialize, Serialize};

/// Punitive duty extension, informational only
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Penalty {
    pub id: i64,
    pub room_number: i64,
    pub kind: String,
    pub reason: String,
    /// YYYY-MM-DD
    pub start_date: String,
    /// `start_date + duration_days`
    pub end_date: String,
    pub issued_by: String,
    pub created_at: i64,
}

/// Issue penalty payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyIssue {
    pub room_number: i64,
    pub duration_days: i64,
    pub reason: Option<String>,
}

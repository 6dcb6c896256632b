//! Attendance Ledger (考勤)
//!
//! One headcount per floor per date; a later submission for the same
//! `(date, floor)` overwrites the earlier one.

pub mod session;

pub use session::{AttendanceSession, SessionStep, SessionStore};

use chrono::NaiveDate;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{AttendanceRecord, AttendanceReport};
use sqlx::SqlitePool;

use crate::db::repository::{attendance, date_key, floor};
use crate::utils::time::SharedClock;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};

#[derive(Clone)]
pub struct AttendanceLedger {
    pool: SqlitePool,
    clock: SharedClock,
}

impl AttendanceLedger {
    pub fn new(pool: SqlitePool, clock: SharedClock) -> Self {
        Self { pool, clock }
    }

    /// Record a floor's headcount (update-or-insert)
    pub async fn submit(
        &self,
        floor_id: i64,
        student_count: i64,
        submitted_by: &str,
        notes: Option<String>,
        date: NaiveDate,
    ) -> AppResult<AttendanceRecord> {
        if student_count < 0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("student_count must not be negative, got {student_count}"),
            ));
        }
        let notes = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        validate_optional_text(notes.as_deref(), "notes", MAX_NOTE_LEN)?;

        if floor::find_by_id(&self.pool, floor_id).await?.is_none() {
            return Err(AppError::with_message(
                ErrorCode::FloorNotFound,
                format!("Floor {floor_id} not found"),
            ));
        }

        let key = date_key(date);
        let record = attendance::upsert(
            &self.pool,
            &key,
            floor_id,
            student_count,
            notes.as_deref(),
            submitted_by,
            self.clock.now_millis(),
        )
        .await?;

        tracing::info!(
            date = %key,
            floor = floor_id,
            student_count,
            submitted_by,
            "Attendance recorded"
        );
        Ok(record)
    }

    pub async fn by_date(&self, date: NaiveDate) -> AppResult<Vec<AttendanceRecord>> {
        Ok(attendance::find_by_date(&self.pool, &date_key(date)).await?)
    }

    pub async fn report(&self, date: NaiveDate) -> AppResult<AttendanceReport> {
        let records = self.by_date(date).await?;
        let floors_registered = floor::count(&self.pool).await?;
        Ok(AttendanceReport {
            date: date_key(date),
            total_students: records.iter().map(|r| r.student_count).sum(),
            floors_submitted: records.len(),
            floors_registered: floors_registered as usize,
            records,
        })
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

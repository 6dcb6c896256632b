//! Penalty Ledger (处罚记录)
//!
//! Append-only log of punitive duty extensions for human reporting. Entries do
//! not feed back into duty weights or the rotation.

use chrono::{Days, NaiveDate};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Penalty;
use sqlx::SqlitePool;

use crate::db::repository::penalty::{self, NewPenalty};
use crate::db::repository::{date_key, room};
use crate::utils::time::SharedClock;
use crate::utils::validation::{MAX_NOTE_LEN, validate_required_text};

/// Kind recorded for every penalty issued through the ledger
pub const DUTY_EXTENSION: &str = "DUTY_EXTENSION";

const DEFAULT_REASON: &str = "missed duty";

#[derive(Clone)]
pub struct PenaltyLedger {
    pool: SqlitePool,
    clock: SharedClock,
}

impl PenaltyLedger {
    pub fn new(pool: SqlitePool, clock: SharedClock) -> Self {
        Self { pool, clock }
    }

    /// Append a penalty starting today and ending `duration_days` later
    pub async fn issue(
        &self,
        room_number: i64,
        duration_days: i64,
        reason: Option<&str>,
        issued_by: &str,
    ) -> AppResult<Penalty> {
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REASON);
        validate_required_text(reason, "reason", MAX_NOTE_LEN)?;

        if duration_days < 1 {
            return Err(AppError::with_message(
                ErrorCode::PenaltyInvalidDuration,
                format!("duration_days must be at least 1, got {duration_days}"),
            ));
        }
        if room::find_by_number(&self.pool, room_number).await?.is_none() {
            return Err(AppError::with_message(
                ErrorCode::RoomNotFound,
                format!("Room {room_number} not found"),
            ));
        }

        let start = self.clock.today();
        let end = end_date(start, duration_days)?;
        let start_key = date_key(start);
        let end_key = date_key(end);

        let created = penalty::insert(
            &self.pool,
            NewPenalty {
                room_number,
                kind: DUTY_EXTENSION,
                reason,
                start_date: &start_key,
                end_date: &end_key,
                issued_by,
                created_at: self.clock.now_millis(),
            },
        )
        .await?;

        tracing::info!(
            room = room_number,
            duration_days,
            start = %start_key,
            end = %end_key,
            issued_by,
            "Penalty issued"
        );
        Ok(created)
    }

    /// Newest first, optionally for one room
    pub async fn list(&self, room_number: Option<i64>) -> AppResult<Vec<Penalty>> {
        let penalties = match room_number {
            Some(number) => penalty::find_by_room(&self.pool, number).await?,
            None => penalty::find_all(&self.pool).await?,
        };
        Ok(penalties)
    }

    /// Entries in the whole log
    pub async fn count(&self) -> AppResult<i64> {
        Ok(penalty::count(&self.pool).await?)
    }
}

fn end_date(start: NaiveDate, duration_days: i64) -> AppResult<NaiveDate> {
    u64::try_from(duration_days)
        .ok()
        .and_then(|days| start.checked_add_days(Days::new(days)))
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::PenaltyInvalidDuration,
                format!("duration_days {duration_days} is out of range"),
            )
        })
}

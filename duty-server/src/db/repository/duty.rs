//! Duty Record Repository

use super::RepoResult;
use shared::models::{DutyRecord, DutyStatus};
use sqlx::SqliteExecutor;

const COLUMNS: &str =
    "id, date, floor, room_number, status, confirmed_by, confirmed_at, created_at";

pub async fn find_by_date_floor<'e>(
    db: impl SqliteExecutor<'e>,
    date: &str,
    floor: i64,
) -> RepoResult<Option<DutyRecord>> {
    let sql = format!("SELECT {COLUMNS} FROM duty_record WHERE date = ? AND floor = ?");
    let record = sqlx::query_as::<_, DutyRecord>(&sql)
        .bind(date)
        .bind(floor)
        .fetch_optional(db)
        .await?;
    Ok(record)
}

pub async fn find_by_date<'e>(db: impl SqliteExecutor<'e>, date: &str) -> RepoResult<Vec<DutyRecord>> {
    let sql = format!("SELECT {COLUMNS} FROM duty_record WHERE date = ? ORDER BY floor");
    let records = sqlx::query_as::<_, DutyRecord>(&sql)
        .bind(date)
        .fetch_all(db)
        .await?;
    Ok(records)
}

/// Insert a PENDING record unless one already exists for `(date, floor)`
///
/// Returns `None` when another writer got there first.
pub async fn insert_pending<'e>(
    db: impl SqliteExecutor<'e>,
    date: &str,
    floor: i64,
    room_number: i64,
    now: i64,
) -> RepoResult<Option<DutyRecord>> {
    let sql = format!(
        "INSERT INTO duty_record (date, floor, room_number, status, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT(date, floor) DO NOTHING \
         RETURNING {COLUMNS}"
    );
    let record = sqlx::query_as::<_, DutyRecord>(&sql)
        .bind(date)
        .bind(floor)
        .bind(room_number)
        .bind(DutyStatus::Pending)
        .bind(now)
        .fetch_optional(db)
        .await?;
    Ok(record)
}

/// Mark the PENDING record of `room_number` on `date` as completed
///
/// Completed records are left as they are; returns `None` when nothing matched.
pub async fn confirm<'e>(
    db: impl SqliteExecutor<'e>,
    date: &str,
    room_number: i64,
    confirmed_by: &str,
    now: i64,
) -> RepoResult<Option<DutyRecord>> {
    let sql = format!(
        "UPDATE duty_record SET status = ?1, confirmed_by = ?2, confirmed_at = ?3 \
         WHERE id = (SELECT id FROM duty_record \
                     WHERE date = ?4 AND room_number = ?5 AND status = ?6 \
                     ORDER BY floor LIMIT 1) \
         RETURNING {COLUMNS}"
    );
    let record = sqlx::query_as::<_, DutyRecord>(&sql)
        .bind(DutyStatus::Completed)
        .bind(confirmed_by)
        .bind(now)
        .bind(date)
        .bind(room_number)
        .bind(DutyStatus::Pending)
        .fetch_optional(db)
        .await?;
    Ok(record)
}

/// Point an existing record at another room; status and confirmation stay
pub async fn reassign_room<'e>(
    db: impl SqliteExecutor<'e>,
    date: &str,
    floor: i64,
    room_number: i64,
) -> RepoResult<Option<DutyRecord>> {
    let sql = format!(
        "UPDATE duty_record SET room_number = ?1 WHERE date = ?2 AND floor = ?3 \
         RETURNING {COLUMNS}"
    );
    let record = sqlx::query_as::<_, DutyRecord>(&sql)
        .bind(room_number)
        .bind(date)
        .bind(floor)
        .fetch_optional(db)
        .await?;
    Ok(record)
}

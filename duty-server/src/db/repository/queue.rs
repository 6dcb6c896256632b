//! Deferral Queue Repository

use super::RepoResult;
use shared::models::QueueEntry;
use sqlx::SqliteExecutor;

pub async fn insert<'e>(
    db: impl SqliteExecutor<'e>,
    floor: i64,
    room_number: i64,
    reason: &str,
    recorded_by: &str,
    now: i64,
) -> RepoResult<QueueEntry> {
    let entry = sqlx::query_as::<_, QueueEntry>(
        "INSERT INTO duty_queue (floor, room_number, reason, recorded_by, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         RETURNING id, floor, room_number, reason, recorded_by, created_at",
    )
    .bind(floor)
    .bind(room_number)
    .bind(reason)
    .bind(recorded_by)
    .bind(now)
    .fetch_one(db)
    .await?;
    Ok(entry)
}

/// Head of a floor's queue (smallest id)
pub async fn oldest_for_floor<'e>(
    db: impl SqliteExecutor<'e>,
    floor: i64,
) -> RepoResult<Option<QueueEntry>> {
    let entry = sqlx::query_as::<_, QueueEntry>(
        "SELECT id, floor, room_number, reason, recorded_by, created_at \
         FROM duty_queue WHERE floor = ? ORDER BY id LIMIT 1",
    )
    .bind(floor)
    .fetch_optional(db)
    .await?;
    Ok(entry)
}

pub async fn delete<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM duty_queue WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn find_all<'e>(db: impl SqliteExecutor<'e>) -> RepoResult<Vec<QueueEntry>> {
    let entries = sqlx::query_as::<_, QueueEntry>(
        "SELECT id, floor, room_number, reason, recorded_by, created_at \
         FROM duty_queue ORDER BY floor, id",
    )
    .fetch_all(db)
    .await?;
    Ok(entries)
}

//! Penalty Repository

use super::RepoResult;
use shared::models::Penalty;
use sqlx::SqliteExecutor;

const COLUMNS: &str = "id, room_number, kind, reason, start_date, end_date, issued_by, created_at";

pub struct NewPenalty<'a> {
    pub room_number: i64,
    pub kind: &'a str,
    pub reason: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub issued_by: &'a str,
    pub created_at: i64,
}

pub async fn insert<'e>(db: impl SqliteExecutor<'e>, penalty: NewPenalty<'_>) -> RepoResult<Penalty> {
    let sql = format!(
        "INSERT INTO penalty (room_number, kind, reason, start_date, end_date, issued_by, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING {COLUMNS}"
    );
    let created = sqlx::query_as::<_, Penalty>(&sql)
        .bind(penalty.room_number)
        .bind(penalty.kind)
        .bind(penalty.reason)
        .bind(penalty.start_date)
        .bind(penalty.end_date)
        .bind(penalty.issued_by)
        .bind(penalty.created_at)
        .fetch_one(db)
        .await?;
    Ok(created)
}

pub async fn find_all<'e>(db: impl SqliteExecutor<'e>) -> RepoResult<Vec<Penalty>> {
    let sql = format!("SELECT {COLUMNS} FROM penalty ORDER BY id DESC");
    let penalties = sqlx::query_as::<_, Penalty>(&sql).fetch_all(db).await?;
    Ok(penalties)
}

pub async fn count<'e>(db: impl SqliteExecutor<'e>) -> RepoResult<i64> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM penalty")
        .fetch_one(db)
        .await?;
    Ok(total)
}

pub async fn find_by_room<'e>(db: impl SqliteExecutor<'e>, room_number: i64) -> RepoResult<Vec<Penalty>> {
    let sql = format!("SELECT {COLUMNS} FROM penalty WHERE room_number = ? ORDER BY id DESC");
    let penalties = sqlx::query_as::<_, Penalty>(&sql)
        .bind(room_number)
        .fetch_all(db)
        .await?;
    Ok(penalties)
}

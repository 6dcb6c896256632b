//! Floor Repository

use super::{RepoError, RepoResult};
use shared::models::Floor;
use sqlx::SqliteExecutor;

pub async fn find_all<'e>(db: impl SqliteExecutor<'e>) -> RepoResult<Vec<Floor>> {
    let floors = sqlx::query_as::<_, Floor>("SELECT id, group_chat_id FROM floor ORDER BY id")
        .fetch_all(db)
        .await?;
    Ok(floors)
}

pub async fn find_by_id<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Floor>> {
    let floor = sqlx::query_as::<_, Floor>("SELECT id, group_chat_id FROM floor WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(floor)
}

/// Smallest registered floor id (the rotation offset base)
pub async fn lowest<'e>(db: impl SqliteExecutor<'e>) -> RepoResult<Option<i64>> {
    let lowest: Option<i64> = sqlx::query_scalar("SELECT MIN(id) FROM floor")
        .fetch_one(db)
        .await?;
    Ok(lowest)
}

pub async fn count<'e>(db: impl SqliteExecutor<'e>) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM floor")
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn create<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<()> {
    sqlx::query("INSERT OR IGNORE INTO floor (id) VALUES (?)")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn set_group<'e>(
    db: impl SqliteExecutor<'e>,
    id: i64,
    group_chat_id: Option<&str>,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE floor SET group_chat_id = ? WHERE id = ?")
        .bind(group_chat_id)
        .bind(id)
        .execute(db)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Floor {id} not found")));
    }
    Ok(())
}

//! Supervisor Repository

use super::{RepoError, RepoResult};
use shared::models::{Supervisor, SupervisorDetail};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

async fn floors_of<'e>(db: impl SqliteExecutor<'e>, supervisor_id: i64) -> RepoResult<Vec<i64>> {
    let floors: Vec<i64> = sqlx::query_scalar(
        "SELECT floor FROM supervisor_floor WHERE supervisor_id = ? ORDER BY floor",
    )
    .bind(supervisor_id)
    .fetch_all(db)
    .await?;
    Ok(floors)
}

pub async fn find_by_identity(
    pool: &SqlitePool,
    identity: &str,
) -> RepoResult<Option<SupervisorDetail>> {
    let supervisor = sqlx::query_as::<_, Supervisor>(
        "SELECT id, identity, name, created_at FROM supervisor WHERE identity = ?",
    )
    .bind(identity)
    .fetch_optional(pool)
    .await?;

    match supervisor {
        Some(supervisor) => {
            let floors = floors_of(pool, supervisor.id).await?;
            Ok(Some(SupervisorDetail { supervisor, floors }))
        }
        None => Ok(None),
    }
}

/// Identity check used inside the skip transaction
pub async fn supervises(conn: &mut SqliteConnection, identity: &str, floor: i64) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar(
        "SELECT s.id FROM supervisor s \
         JOIN supervisor_floor sf ON sf.supervisor_id = s.id \
         WHERE s.identity = ? AND sf.floor = ?",
    )
    .bind(identity)
    .bind(floor)
    .fetch_optional(conn)
    .await?;
    Ok(found.is_some())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<SupervisorDetail>> {
    let supervisors = sqlx::query_as::<_, Supervisor>(
        "SELECT id, identity, name, created_at FROM supervisor ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let mut details = Vec::with_capacity(supervisors.len());
    for supervisor in supervisors {
        let floors = floors_of(pool, supervisor.id).await?;
        details.push(SupervisorDetail { supervisor, floors });
    }
    Ok(details)
}

/// Create a supervisor, or replace name and floors of an existing identity
pub async fn upsert(
    pool: &SqlitePool,
    identity: &str,
    name: &str,
    floors: &[i64],
    now: i64,
) -> RepoResult<SupervisorDetail> {
    let mut tx = pool.begin().await?;

    for floor in floors {
        if super::floor::find_by_id(&mut *tx, *floor).await?.is_none() {
            return Err(RepoError::NotFound(format!("Floor {floor} not found")));
        }
    }

    let supervisor = sqlx::query_as::<_, Supervisor>(
        "INSERT INTO supervisor (identity, name, created_at) VALUES (?1, ?2, ?3) \
         ON CONFLICT(identity) DO UPDATE SET name = excluded.name \
         RETURNING id, identity, name, created_at",
    )
    .bind(identity)
    .bind(name)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM supervisor_floor WHERE supervisor_id = ?")
        .bind(supervisor.id)
        .execute(&mut *tx)
        .await?;

    for floor in floors {
        sqlx::query("INSERT OR IGNORE INTO supervisor_floor (supervisor_id, floor) VALUES (?1, ?2)")
            .bind(supervisor.id)
            .bind(floor)
            .execute(&mut *tx)
            .await?;
    }

    let floors = floors_of(&mut *tx, supervisor.id).await?;
    tx.commit().await?;
    Ok(SupervisorDetail { supervisor, floors })
}

pub async fn delete<'e>(db: impl SqliteExecutor<'e>, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM supervisor WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Supervisor {id} not found")));
    }
    Ok(())
}

//! Room Repository

use super::{RepoError, RepoResult};
use shared::models::{MAX_DUTY_WEIGHT, Room};
use sqlx::{SqliteExecutor, SqlitePool};

/// Rooms of a floor in ascending number order (the rotation order)
pub async fn find_by_floor<'e>(db: impl SqliteExecutor<'e>, floor: i64) -> RepoResult<Vec<Room>> {
    let rooms = sqlx::query_as::<_, Room>(
        "SELECT number, floor, duty_weight FROM room WHERE floor = ? ORDER BY number",
    )
    .bind(floor)
    .fetch_all(db)
    .await?;
    Ok(rooms)
}

pub async fn find_by_number<'e>(db: impl SqliteExecutor<'e>, number: i64) -> RepoResult<Option<Room>> {
    let room = sqlx::query_as::<_, Room>(
        "SELECT number, floor, duty_weight FROM room WHERE number = ?",
    )
    .bind(number)
    .fetch_optional(db)
    .await?;
    Ok(room)
}

fn check_weight(duty_weight: i64) -> RepoResult<()> {
    if !(1..=MAX_DUTY_WEIGHT).contains(&duty_weight) {
        return Err(RepoError::Validation(format!(
            "duty_weight must be between 1 and {MAX_DUTY_WEIGHT}, got {duty_weight}"
        )));
    }
    Ok(())
}

pub async fn create<'e>(
    db: impl SqliteExecutor<'e>,
    number: i64,
    floor: i64,
    duty_weight: i64,
) -> RepoResult<()> {
    check_weight(duty_weight)?;
    sqlx::query("INSERT INTO room (number, floor, duty_weight) VALUES (?1, ?2, ?3)")
        .bind(number)
        .bind(floor)
        .bind(duty_weight)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn update_weight<'e>(
    db: impl SqliteExecutor<'e>,
    number: i64,
    duty_weight: i64,
) -> RepoResult<()> {
    check_weight(duty_weight)?;
    let rows = sqlx::query("UPDATE room SET duty_weight = ? WHERE number = ?")
        .bind(duty_weight)
        .bind(number)
        .execute(db)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Room {number} not found")));
    }
    Ok(())
}

/// First-run seeding; a no-op when any room exists
pub async fn seed(
    pool: &SqlitePool,
    lowest_floor: i64,
    highest_floor: i64,
    rooms_per_floor: i64,
) -> RepoResult<u64> {
    let mut tx = pool.begin().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM room")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        return Ok(0);
    }

    let mut created = 0;
    for floor in lowest_floor..=highest_floor {
        super::floor::create(&mut *tx, floor).await?;
        for index in 1..=rooms_per_floor {
            create(&mut *tx, Room::number_for(floor, index), floor, 1).await?;
            created += 1;
        }
    }

    tx.commit().await?;
    Ok(created)
}

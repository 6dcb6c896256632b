//! Attendance Repository

use super::RepoResult;
use shared::models::AttendanceRecord;
use sqlx::SqliteExecutor;

const COLUMNS: &str = "id, date, floor, student_count, notes, submitted_by, submitted_at";

/// Insert or overwrite the `(date, floor)` headcount
pub async fn upsert<'e>(
    db: impl SqliteExecutor<'e>,
    date: &str,
    floor: i64,
    student_count: i64,
    notes: Option<&str>,
    submitted_by: &str,
    now: i64,
) -> RepoResult<AttendanceRecord> {
    let sql = format!(
        "INSERT INTO attendance (date, floor, student_count, notes, submitted_by, submitted_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
         ON CONFLICT(date, floor) DO UPDATE SET \
             student_count = excluded.student_count, \
             notes = excluded.notes, \
             submitted_by = excluded.submitted_by, \
             submitted_at = excluded.submitted_at \
         RETURNING {COLUMNS}"
    );
    let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(date)
        .bind(floor)
        .bind(student_count)
        .bind(notes)
        .bind(submitted_by)
        .bind(now)
        .fetch_one(db)
        .await?;
    Ok(record)
}

pub async fn find_by_date<'e>(
    db: impl SqliteExecutor<'e>,
    date: &str,
) -> RepoResult<Vec<AttendanceRecord>> {
    let sql = format!("SELECT {COLUMNS} FROM attendance WHERE date = ? ORDER BY floor");
    let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(date)
        .fetch_all(db)
        .await?;
    Ok(records)
}

pub async fn find_by_date_floor<'e>(
    db: impl SqliteExecutor<'e>,
    date: &str,
    floor: i64,
) -> RepoResult<Option<AttendanceRecord>> {
    let sql = format!("SELECT {COLUMNS} FROM attendance WHERE date = ? AND floor = ?");
    let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(date)
        .bind(floor)
        .fetch_optional(db)
        .await?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_latest_submission_wins() {
        let db = DbService::in_memory().await.unwrap();
        let first = upsert(&db.pool, "2026-04-10", 3, 40, None, "5:Kamola", 1).await.unwrap();
        let second = upsert(&db.pool, "2026-04-10", 3, 38, Some("2 on leave"), "6:Bek", 2)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.student_count, 38);
        assert_eq!(second.submitted_by, "6:Bek");

        let all = find_by_date(&db.pool, "2026-04-10").await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(find_by_date_floor(&db.pool, "2026-04-11", 3).await.unwrap().is_none());
    }
}

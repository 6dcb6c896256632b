//! Duty Scheduler (值日调度)
//!
//! Owns creation of duty records and consumption of the deferral queue.
//!
//! Each floor is scheduled in its own transaction: existence check, queue pop
//! and record insert commit together or not at all. The insert is guarded by
//! `UNIQUE(date, floor)`, so a writer that loses a race rolls back (restoring
//! any popped queue entry) and reports the winner's record instead.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use shared::models::{DutyRecord, DutyView, QueueEntry, SkipOutcome};
use sqlx::{SqliteConnection, SqlitePool};
use tokio::sync::Mutex;

use super::report;
use super::rotation::{self, DutySequence};
use super::{DutyError, DutyResult};
use crate::db::repository::{date_key, duty, floor, queue, room, supervisor};
use crate::utils::time::SharedClock;
use crate::utils::validation::MAX_NOTE_LEN;

const DEFAULT_SKIP_REASON: &str = "not specified";

/// Outcome of one schedule generation
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ScheduleRun {
    pub date: String,
    /// Records inserted by this run
    pub created: Vec<DutyRecord>,
    /// Records that already existed
    pub existing: Vec<DutyRecord>,
    /// Floors without rooms
    pub skipped_floors: Vec<i64>,
}

impl ScheduleRun {
    /// All records for the date, ordered by floor
    pub fn records(&self) -> Vec<DutyRecord> {
        let mut all: Vec<DutyRecord> = self
            .created
            .iter()
            .chain(self.existing.iter())
            .cloned()
            .collect();
        all.sort_by_key(|r| r.floor);
        all
    }
}

enum FloorOutcome {
    Created(DutyRecord),
    Existing(DutyRecord),
}

/// Skip request, already authenticated at the transport layer
#[derive(Debug, Clone)]
pub struct SkipRequest<'a> {
    pub floor: i64,
    pub room_number: i64,
    pub reason: Option<&'a str>,
    pub requester_id: &'a str,
    pub requester_name: Option<&'a str>,
    pub date: NaiveDate,
}

#[derive(Clone)]
pub struct DutyScheduler {
    pool: SqlitePool,
    clock: SharedClock,
    run_lock: Arc<Mutex<()>>,
}

impl DutyScheduler {
    pub fn new(pool: SqlitePool, clock: SharedClock) -> Self {
        Self {
            pool,
            clock,
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Guarantee exactly one record per registered floor for today
    pub async fn ensure_today_schedule(&self) -> DutyResult<ScheduleRun> {
        self.ensure_schedule(self.clock.today()).await
    }

    /// Guarantee exactly one record per registered floor for `date`
    ///
    /// Floors that already have a record are left alone. Floors without rooms
    /// are reported in `skipped_floors` and do not stop the run.
    pub async fn ensure_schedule(&self, date: NaiveDate) -> DutyResult<ScheduleRun> {
        let _guard = self.run_lock.lock().await;

        let key = date_key(date);
        let floors = floor::find_all(&self.pool).await?;
        let mut run = ScheduleRun {
            date: key.clone(),
            ..Default::default()
        };

        // find_all is ordered by id
        let Some(lowest_floor) = floors.first().map(|f| f.id) else {
            tracing::warn!(date = %key, "No floors registered, nothing to schedule");
            return Ok(run);
        };

        for f in &floors {
            match self.ensure_floor(&key, date, f.id, lowest_floor).await {
                Ok(FloorOutcome::Created(record)) => {
                    tracing::info!(
                        date = %key,
                        floor = record.floor,
                        room = record.room_number,
                        "Duty assigned"
                    );
                    run.created.push(record);
                }
                Ok(FloorOutcome::Existing(record)) => run.existing.push(record),
                Err(DutyError::EmptySequence { floor }) => {
                    tracing::warn!(date = %key, floor, "Floor has no rooms, skipping");
                    run.skipped_floors.push(floor);
                }
                Err(e) => {
                    tracing::error!(date = %key, floor = f.id, error = %e, "Schedule generation failed");
                    return Err(e);
                }
            }
        }

        if !run.created.is_empty() {
            tracing::info!(
                date = %key,
                created = run.created.len(),
                existing = run.existing.len(),
                skipped = run.skipped_floors.len(),
                "Schedule generated"
            );
        }
        Ok(run)
    }

    async fn ensure_floor(
        &self,
        key: &str,
        date: NaiveDate,
        floor_id: i64,
        lowest_floor: i64,
    ) -> DutyResult<FloorOutcome> {
        let mut tx = self.pool.begin().await?;

        if let Some(existing) = duty::find_by_date_floor(&mut *tx, key, floor_id).await? {
            return Ok(FloorOutcome::Existing(existing));
        }

        let room_number = match queue::oldest_for_floor(&mut *tx, floor_id).await? {
            Some(entry) => {
                queue::delete(&mut *tx, entry.id).await?;
                tracing::info!(
                    floor = floor_id,
                    room = entry.room_number,
                    queue_id = entry.id,
                    "Serving deferred duty"
                );
                entry.room_number
            }
            None => {
                let rooms = room::find_by_floor(&mut *tx, floor_id).await?;
                DutySequence::build(&rooms)
                    .room_for(date, floor_id, lowest_floor)
                    .ok_or(DutyError::EmptySequence { floor: floor_id })?
            }
        };

        let now = self.clock.now_millis();
        match duty::insert_pending(&mut *tx, key, floor_id, room_number, now).await? {
            Some(record) => {
                tx.commit().await?;
                Ok(FloorOutcome::Created(record))
            }
            None => {
                // Lost the race: undo the queue pop and report the winner
                tx.rollback().await?;
                tracing::debug!(date = %key, floor = floor_id, "Duty record created concurrently");
                duty::find_by_date_floor(&self.pool, key, floor_id)
                    .await?
                    .map(FloorOutcome::Existing)
                    .ok_or_else(|| DutyError::record_not_found(key, floor_id))
            }
        }
    }

    /// Mark `room_number`'s pending duty on `date` as completed
    ///
    /// Not an error when nothing matches: late or repeated confirmations are
    /// silent no-ops and an existing confirmation is never overwritten.
    pub async fn confirm(
        &self,
        room_number: i64,
        confirmed_by: &str,
        date: NaiveDate,
    ) -> DutyResult<Option<DutyRecord>> {
        let key = date_key(date);
        let now = self.clock.now_millis();
        let record = duty::confirm(&self.pool, &key, room_number, confirmed_by, now).await?;

        match &record {
            Some(r) => tracing::info!(
                date = %key,
                floor = r.floor,
                room = room_number,
                confirmed_by,
                "Duty confirmed"
            ),
            None => tracing::debug!(date = %key, room = room_number, "No pending duty to confirm"),
        }
        Ok(record)
    }

    /// Fail with `Unauthorized` unless `identity` supervises `floor`
    ///
    /// Read-only; lets callers reject a skip before touching any record.
    pub async fn authorize_skip(&self, identity: &str, floor: i64) -> DutyResult<()> {
        let mut conn = self.pool.acquire().await?;
        require_supervisor(&mut *conn, identity, floor).await
    }

    /// Defer a room's turn and hand today's duty to its circular successor
    ///
    /// Only a supervisor of `floor` may skip. Queue insert and record rewrite
    /// are one transaction; on any failure nothing is written.
    pub async fn skip(&self, req: SkipRequest<'_>) -> DutyResult<SkipOutcome> {
        let reason = req
            .reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_SKIP_REASON);
        let reason_len = reason.chars().count();
        if reason_len > MAX_NOTE_LEN {
            return Err(DutyError::Validation(format!(
                "reason is too long ({reason_len} chars, max {MAX_NOTE_LEN})"
            )));
        }

        let key = date_key(req.date);
        let recorded_by = shared::util::actor_label(req.requester_id, req.requester_name);
        let mut tx = self.pool.begin().await?;

        require_supervisor(&mut *tx, req.requester_id, req.floor).await?;

        let rooms = room::find_by_floor(&mut *tx, req.floor).await?;
        let next_room = rotation::next_room(&rooms, req.room_number)
            .ok_or(DutyError::EmptySequence { floor: req.floor })?;

        let now = self.clock.now_millis();
        let queued = queue::insert(
            &mut *tx,
            req.floor,
            req.room_number,
            reason,
            &recorded_by,
            now,
        )
        .await?;
        let record = duty::reassign_room(&mut *tx, &key, req.floor, next_room).await?;

        tx.commit().await?;

        tracing::info!(
            date = %key,
            floor = req.floor,
            room = req.room_number,
            next_room,
            queue_id = queued.id,
            recorded_by = %recorded_by,
            "Duty skipped"
        );

        Ok(SkipOutcome {
            queued,
            next_room,
            record,
        })
    }

    /// All duty records for `date`, ordered by floor
    pub async fn today_duties(&self, date: NaiveDate) -> DutyResult<Vec<DutyView>> {
        let records = duty::find_by_date(&self.pool, &date_key(date)).await?;
        Ok(records.into_iter().map(to_view).collect())
    }

    pub async fn duty_for_floor(&self, date: NaiveDate, floor_id: i64) -> DutyResult<DutyView> {
        if floor::find_by_id(&self.pool, floor_id).await?.is_none() {
            return Err(DutyError::floor_not_found(floor_id));
        }
        let key = date_key(date);
        duty::find_by_date_floor(&self.pool, &key, floor_id)
            .await?
            .map(to_view)
            .ok_or_else(|| DutyError::record_not_found(&key, floor_id))
    }

    /// Outstanding deferrals, by floor then queue order
    pub async fn queued_rooms(&self) -> DutyResult<Vec<QueueEntry>> {
        Ok(queue::find_all(&self.pool).await?)
    }

    pub async fn report(&self, date: NaiveDate) -> DutyResult<shared::models::DutyReport> {
        let records = duty::find_by_date(&self.pool, &date_key(date)).await?;
        Ok(report::build(&date_key(date), records))
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn to_view(record: DutyRecord) -> DutyView {
    DutyView {
        general_cleaning: rotation::is_general_cleaning_room(record.room_number),
        record,
    }
}

async fn require_supervisor(
    conn: &mut SqliteConnection,
    identity: &str,
    floor: i64,
) -> DutyResult<()> {
    if supervisor::supervises(conn, identity, floor).await? {
        return Ok(());
    }
    tracing::warn!(
        floor,
        requester = identity,
        "Skip rejected: requester is not a supervisor of this floor"
    );
    Err(DutyError::Unauthorized(format!(
        "{identity} is not a supervisor of floor {floor}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::utils::time::{Clock, FixedClock};
    use shared::models::DutyStatus;

    const SUPERVISOR: &str = "1001";

    fn day_100() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 10).unwrap()
    }

    async fn setup() -> (DutyScheduler, Arc<FixedClock>) {
        let db = DbService::in_memory().await.unwrap();
        db.seed_registry(2, 9, 12).await.unwrap();
        supervisor::upsert(&db.pool, SUPERVISOR, "Dilnoza", &[2, 3], 0)
            .await
            .unwrap();
        let clock = Arc::new(FixedClock::new(day_100()));
        (DutyScheduler::new(db.pool, clock.clone()), clock)
    }

    fn skip_req(floor: i64, room_number: i64, requester_id: &str, date: NaiveDate) -> SkipRequest<'_> {
        SkipRequest {
            floor,
            room_number,
            reason: Some("sick"),
            requester_id,
            requester_name: Some("Dilnoza"),
            date,
        }
    }

    async fn room_on(scheduler: &DutyScheduler, date: NaiveDate, floor: i64) -> i64 {
        scheduler.duty_for_floor(date, floor).await.unwrap().record.room_number
    }

    #[tokio::test]
    async fn test_ensure_schedule_is_idempotent() {
        let (scheduler, _) = setup().await;

        let first = scheduler.ensure_today_schedule().await.unwrap();
        assert_eq!(first.created.len(), 8);
        assert!(first.existing.is_empty());

        let second = scheduler.ensure_today_schedule().await.unwrap();
        assert!(second.created.is_empty());
        assert_eq!(second.existing.len(), 8);
        assert_eq!(first.records(), second.records());

        let stored = scheduler.today_duties(day_100()).await.unwrap();
        assert_eq!(stored.len(), 8);
    }

    #[tokio::test]
    async fn test_rotation_rooms_for_day_100() {
        let (scheduler, _) = setup().await;
        scheduler.ensure_schedule(day_100()).await.unwrap();

        assert_eq!(room_on(&scheduler, day_100(), 2).await, 205);
        assert_eq!(room_on(&scheduler, day_100(), 3).await, 308);
        // (100 + 7*3) % 12 = 1
        assert_eq!(room_on(&scheduler, day_100(), 9).await, 902);
    }

    #[tokio::test]
    async fn test_weight_changes_sequence() {
        let (scheduler, _) = setup().await;
        room::update_weight(scheduler.pool(), 201, 2).await.unwrap();
        scheduler.ensure_schedule(day_100()).await.unwrap();

        // Sequence is 201,201,202,... (13 slots); 100 % 13 = 9 → 209
        assert_eq!(room_on(&scheduler, day_100(), 2).await, 209);
    }

    #[tokio::test]
    async fn test_concurrent_runs_produce_one_record_per_floor() {
        let (scheduler, _) = setup().await;
        let a = scheduler.clone();
        let b = scheduler.clone();

        let (ra, rb) = tokio::join!(a.ensure_today_schedule(), b.ensure_today_schedule());
        let (ra, rb) = (ra.unwrap(), rb.unwrap());

        assert_eq!(ra.created.len() + rb.created.len(), 8);
        assert_eq!(ra.records(), rb.records());
    }

    #[tokio::test]
    async fn test_empty_floor_is_skipped() {
        let (scheduler, _) = setup().await;
        floor::create(scheduler.pool(), 10).await.unwrap();

        let run = scheduler.ensure_today_schedule().await.unwrap();
        assert_eq!(run.created.len(), 8);
        assert_eq!(run.skipped_floors, vec![10]);
    }

    #[tokio::test]
    async fn test_existing_record_keeps_queue_entry() {
        let (scheduler, _) = setup().await;
        let key = date_key(day_100());
        duty::insert_pending(scheduler.pool(), &key, 2, 210, 1).await.unwrap();
        queue::insert(scheduler.pool(), 2, 203, "away", "x", 1).await.unwrap();

        scheduler.ensure_schedule(day_100()).await.unwrap();

        assert_eq!(room_on(&scheduler, day_100(), 2).await, 210);
        assert_eq!(scheduler.queued_rooms().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_skip_queues_room_and_rewrites_today() {
        let (scheduler, _) = setup().await;
        scheduler.ensure_today_schedule().await.unwrap();

        let outcome = scheduler
            .skip(skip_req(3, 305, SUPERVISOR, day_100()))
            .await
            .unwrap();
        assert_eq!(outcome.next_room, 306);
        assert_eq!(outcome.queued.room_number, 305);
        assert_eq!(outcome.queued.recorded_by, "1001:Dilnoza");

        let queued = scheduler.queued_rooms().await.unwrap();
        assert_eq!(queued.len(), 1);
        assert_eq!((queued[0].floor, queued[0].room_number), (3, 305));

        assert_eq!(room_on(&scheduler, day_100(), 3).await, 306);
    }

    #[tokio::test]
    async fn test_skip_last_room_wraps_to_first() {
        let (scheduler, _) = setup().await;
        scheduler.ensure_today_schedule().await.unwrap();

        let outcome = scheduler
            .skip(skip_req(2, 212, SUPERVISOR, day_100()))
            .await
            .unwrap();
        assert_eq!(outcome.next_room, 201);
    }

    #[tokio::test]
    async fn test_deferrals_are_served_in_order() {
        let (scheduler, clock) = setup().await;
        scheduler.ensure_today_schedule().await.unwrap();

        scheduler.skip(skip_req(3, 304, SUPERVISOR, day_100())).await.unwrap();
        scheduler.skip(skip_req(3, 310, SUPERVISOR, day_100())).await.unwrap();

        let day_101 = day_100().succ_opt().unwrap();
        clock.set_date(day_101);
        scheduler.ensure_today_schedule().await.unwrap();
        assert_eq!(room_on(&scheduler, day_101, 3).await, 304);

        let day_102 = day_101.succ_opt().unwrap();
        clock.set_date(day_102);
        scheduler.ensure_today_schedule().await.unwrap();
        assert_eq!(room_on(&scheduler, day_102, 3).await, 310);

        // Queue drained, rotation resumes: (103 + 3) % 12 = 10
        let day_103 = day_102.succ_opt().unwrap();
        clock.set_date(day_103);
        scheduler.ensure_today_schedule().await.unwrap();
        assert_eq!(room_on(&scheduler, day_103, 3).await, 311);
        assert!(scheduler.queued_rooms().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_skip_by_non_supervisor_changes_nothing() {
        let (scheduler, _) = setup().await;
        scheduler.ensure_today_schedule().await.unwrap();
        let before = scheduler.today_duties(day_100()).await.unwrap();

        // Registered supervisor, wrong floor
        let err = scheduler
            .skip(skip_req(4, 405, SUPERVISOR, day_100()))
            .await
            .unwrap_err();
        assert!(matches!(err, DutyError::Unauthorized(_)));

        // Unknown identity
        let err = scheduler
            .skip(skip_req(3, 305, "9999", day_100()))
            .await
            .unwrap_err();
        assert!(matches!(err, DutyError::Unauthorized(_)));

        assert!(scheduler.queued_rooms().await.unwrap().is_empty());
        assert_eq!(scheduler.today_duties(day_100()).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_authorize_skip_is_read_only() {
        let (scheduler, _) = setup().await;

        assert!(scheduler.authorize_skip(SUPERVISOR, 3).await.is_ok());
        let err = scheduler.authorize_skip(SUPERVISOR, 4).await.unwrap_err();
        assert!(matches!(err, DutyError::Unauthorized(_)));
        let err = scheduler.authorize_skip("9999", 3).await.unwrap_err();
        assert!(matches!(err, DutyError::Unauthorized(_)));

        assert!(scheduler.today_duties(day_100()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_twice_keeps_first_confirmation() {
        let (scheduler, _) = setup().await;
        scheduler.ensure_today_schedule().await.unwrap();

        let done = scheduler.confirm(205, "1001:Dilnoza", day_100()).await.unwrap().unwrap();
        assert_eq!(done.status, DutyStatus::Completed);
        let confirmed_at = done.confirmed_at;

        assert!(scheduler.confirm(205, "7:Other", day_100()).await.unwrap().is_none());

        let record = scheduler.duty_for_floor(day_100(), 2).await.unwrap().record;
        assert_eq!(record.status, DutyStatus::Completed);
        assert_eq!(record.confirmed_by.as_deref(), Some("1001:Dilnoza"));
        assert_eq!(record.confirmed_at, confirmed_at);
    }

    #[tokio::test]
    async fn test_confirm_unknown_room_is_silent() {
        let (scheduler, _) = setup().await;
        scheduler.ensure_today_schedule().await.unwrap();
        assert!(scheduler.confirm(999, "x", day_100()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_confirm_skipped_room_after_rewrite_is_silent() {
        let (scheduler, _) = setup().await;
        scheduler.ensure_today_schedule().await.unwrap();
        scheduler.skip(skip_req(2, 205, SUPERVISOR, day_100())).await.unwrap();

        assert!(scheduler.confirm(205, "x", day_100()).await.unwrap().is_none());
        assert!(scheduler.confirm(206, "x", day_100()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_skip_rewrites_completed_record_room() {
        let (scheduler, _) = setup().await;
        scheduler.ensure_today_schedule().await.unwrap();
        scheduler.confirm(205, "1001:Dilnoza", day_100()).await.unwrap();

        scheduler.skip(skip_req(2, 205, SUPERVISOR, day_100())).await.unwrap();

        // Credit silently moves to the successor; status and confirmer stay
        let record = scheduler.duty_for_floor(day_100(), 2).await.unwrap().record;
        assert_eq!(record.room_number, 206);
        assert_eq!(record.status, DutyStatus::Completed);
        assert_eq!(record.confirmed_by.as_deref(), Some("1001:Dilnoza"));
    }

    #[tokio::test]
    async fn test_duty_for_floor_not_found() {
        let (scheduler, _) = setup().await;
        assert!(matches!(
            scheduler.duty_for_floor(day_100(), 42).await,
            Err(DutyError::NotFound { .. })
        ));
        assert!(matches!(
            scheduler.duty_for_floor(day_100(), 2).await,
            Err(DutyError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_general_cleaning_flag_in_views() {
        let (scheduler, clock) = setup().await;
        // Day 97: floor 2 → 97 % 12 = 1 → room 202; floor 3 → 100 % 12 = 4 → 305
        let day_97 = NaiveDate::from_ymd_opt(2026, 4, 7).unwrap();
        clock.set_date(day_97);
        assert_eq!(clock.today(), day_97);
        scheduler.ensure_today_schedule().await.unwrap();

        // Day 96: floor 2 → 0 → 201 (general cleaning)
        let day_96 = NaiveDate::from_ymd_opt(2026, 4, 6).unwrap();
        scheduler.ensure_schedule(day_96).await.unwrap();
        let view = scheduler.duty_for_floor(day_96, 2).await.unwrap();
        assert_eq!(view.record.room_number, 201);
        assert!(view.general_cleaning);

        let view = scheduler.duty_for_floor(day_97, 2).await.unwrap();
        assert_eq!(view.record.room_number, 202);
        assert!(!view.general_cleaning);
    }
}

//! Attendance entry session (考勤录入会话)
//!
//! Step-by-step headcount entry for a supervisor, one floor at a time:
//!
//! ```text
//! SelectingFloor ──floor──▶ EnteringCount ──count──▶ EnteringNotes
//!       ▲                                                  │
//!       └────────── notes (floors left) ◀──────────────────┤
//!                                                          ▼
//!                                                   Done (no floors left)
//! ```
//!
//! Sessions are keyed by supervisor identity and held in memory only.

use dashmap::DashMap;
use serde::Serialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::AttendanceRecord;
use sqlx::SqlitePool;

use super::AttendanceLedger;
use crate::db::repository::supervisor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStep {
    SelectingFloor,
    EnteringCount,
    EnteringNotes,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceSession {
    pub identity: String,
    pub recorded_by: String,
    pub step: SessionStep,
    pub floors_remaining: Vec<i64>,
    pub current_floor: Option<i64>,
    pub current_count: Option<i64>,
    /// Records written during this session
    pub submitted: Vec<AttendanceRecord>,
}

impl AttendanceSession {
    pub fn new(identity: impl Into<String>, recorded_by: impl Into<String>, floors: Vec<i64>) -> Self {
        Self {
            identity: identity.into(),
            recorded_by: recorded_by.into(),
            step: SessionStep::SelectingFloor,
            floors_remaining: floors,
            current_floor: None,
            current_count: None,
            submitted: Vec::new(),
        }
    }

    fn expect_step(&self, step: SessionStep) -> AppResult<()> {
        if self.step != step {
            return Err(AppError::with_message(
                ErrorCode::AttendanceSessionState,
                format!("Session is at {:?}, expected {:?}", self.step, step),
            ));
        }
        Ok(())
    }

    pub fn select_floor(&mut self, floor: i64) -> AppResult<()> {
        self.expect_step(SessionStep::SelectingFloor)?;
        if !self.floors_remaining.contains(&floor) {
            return Err(AppError::validation(format!(
                "Floor {floor} is not pending in this session"
            )));
        }
        self.current_floor = Some(floor);
        self.step = SessionStep::EnteringCount;
        Ok(())
    }

    /// Parse the headcount text; on error the session stays where it was
    pub fn enter_count(&mut self, text: &str) -> AppResult<()> {
        self.expect_step(SessionStep::EnteringCount)?;
        let count: i64 = text
            .trim()
            .parse()
            .map_err(|_| AppError::validation(format!("'{}' is not a number", text.trim())))?;
        if count < 0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "student count must not be negative",
            ));
        }
        self.current_count = Some(count);
        self.step = SessionStep::EnteringNotes;
        Ok(())
    }

    /// Pending `(floor, count)` once notes are due
    fn pending_entry(&self) -> AppResult<(i64, i64)> {
        self.expect_step(SessionStep::EnteringNotes)?;
        match (self.current_floor, self.current_count) {
            (Some(floor), Some(count)) => Ok((floor, count)),
            _ => Err(AppError::with_message(
                ErrorCode::AttendanceSessionState,
                "Session has no floor or count",
            )),
        }
    }

    fn complete_floor(&mut self, record: AttendanceRecord) {
        self.floors_remaining.retain(|f| *f != record.floor);
        self.current_floor = None;
        self.current_count = None;
        self.submitted.push(record);
        self.step = if self.floors_remaining.is_empty() {
            SessionStep::Done
        } else {
            SessionStep::SelectingFloor
        };
    }
}

/// In-memory session map plus the ledger that completed floors write to
#[derive(Clone)]
pub struct SessionStore {
    sessions: std::sync::Arc<DashMap<String, AttendanceSession>>,
    ledger: AttendanceLedger,
    pool: SqlitePool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool, ledger: AttendanceLedger) -> Self {
        Self {
            sessions: std::sync::Arc::new(DashMap::new()),
            ledger,
            pool,
        }
    }

    fn not_found(identity: &str) -> AppError {
        AppError::with_message(
            ErrorCode::AttendanceSessionNotFound,
            format!("No attendance session for {identity}"),
        )
    }

    /// Start (or restart) a session over the supervisor's floors
    pub async fn start(&self, identity: &str, name: Option<&str>) -> AppResult<AttendanceSession> {
        let detail = supervisor::find_by_identity(&self.pool, identity)
            .await?
            .filter(|d| !d.floors.is_empty())
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::NotFloorSupervisor,
                    format!("{identity} is not a floor supervisor"),
                )
            })?;

        let recorded_by = shared::util::actor_label(identity, name);
        let session = AttendanceSession::new(identity, recorded_by, detail.floors);
        self.sessions.insert(identity.to_string(), session.clone());
        tracing::debug!(identity, floors = ?session.floors_remaining, "Attendance session started");
        Ok(session)
    }

    pub fn get(&self, identity: &str) -> Option<AttendanceSession> {
        self.sessions.get(identity).map(|s| s.value().clone())
    }

    pub fn select_floor(&self, identity: &str, floor: i64) -> AppResult<AttendanceSession> {
        let mut session = self
            .sessions
            .get_mut(identity)
            .ok_or_else(|| Self::not_found(identity))?;
        session.select_floor(floor)?;
        Ok(session.value().clone())
    }

    pub fn enter_count(&self, identity: &str, text: &str) -> AppResult<AttendanceSession> {
        let mut session = self
            .sessions
            .get_mut(identity)
            .ok_or_else(|| Self::not_found(identity))?;
        session.enter_count(text)?;
        Ok(session.value().clone())
    }

    /// Submit the current floor with optional notes
    ///
    /// The session is dropped once every floor is in.
    pub async fn enter_notes(
        &self,
        identity: &str,
        notes: Option<String>,
    ) -> AppResult<AttendanceSession> {
        let (floor, count, recorded_by) = {
            let session = self
                .sessions
                .get(identity)
                .ok_or_else(|| Self::not_found(identity))?;
            let (floor, count) = session.pending_entry()?;
            (floor, count, session.recorded_by.clone())
        };

        let date = self.ledger.today();
        let record = self
            .ledger
            .submit(floor, count, &recorded_by, notes, date)
            .await?;

        let mut session = self
            .sessions
            .get_mut(identity)
            .ok_or_else(|| Self::not_found(identity))?;
        session.complete_floor(record);
        let snapshot = session.value().clone();
        drop(session);

        if snapshot.step == SessionStep::Done {
            self.sessions.remove(identity);
            tracing::info!(
                identity,
                floors = snapshot.submitted.len(),
                "Attendance session completed"
            );
        }
        Ok(snapshot)
    }

    pub fn cancel(&self, identity: &str) -> AppResult<()> {
        self.sessions
            .remove(identity)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(identity))
    }
}

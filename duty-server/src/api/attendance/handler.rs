//! Attendance API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::error::AppResult;
use shared::models::{AttendanceRecord, AttendanceReport, AttendanceSubmit};

use crate::api::{DateQuery, Requester};
use crate::attendance::AttendanceSession;
use crate::core::ServerState;
use crate::utils::time;

#[derive(Debug, Deserialize)]
pub struct FloorSelect {
    pub floor: i64,
}

/// Raw text as typed by the supervisor
#[derive(Debug, Deserialize)]
pub struct CountInput {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotesInput {
    pub notes: Option<String>,
}

/// POST /api/attendance - 提交考勤
pub async fn submit(
    State(state): State<ServerState>,
    requester: Requester,
    Json(payload): Json<AttendanceSubmit>,
) -> AppResult<Json<AttendanceRecord>> {
    let date = time::date_or_today(payload.date.as_deref(), state.clock.as_ref())?;
    let record = state
        .attendance
        .submit(
            payload.floor,
            payload.student_count,
            &requester.label(),
            payload.notes,
            date,
        )
        .await?;
    Ok(Json(record))
}

/// GET /api/attendance?date= - 某日考勤
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    let date = time::date_or_today(query.date.as_deref(), state.clock.as_ref())?;
    Ok(Json(state.attendance.by_date(date).await?))
}

/// GET /api/attendance/report?date= - 考勤日报
pub async fn report(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<AttendanceReport>> {
    let date = time::date_or_today(query.date.as_deref(), state.clock.as_ref())?;
    Ok(Json(state.attendance.report(date).await?))
}

pub async fn session_start(
    State(state): State<ServerState>,
    requester: Requester,
) -> AppResult<Json<AttendanceSession>> {
    let session = state
        .sessions
        .start(&requester.id, requester.name.as_deref())
        .await?;
    Ok(Json(session))
}

pub async fn session_floor(
    State(state): State<ServerState>,
    requester: Requester,
    Json(payload): Json<FloorSelect>,
) -> AppResult<Json<AttendanceSession>> {
    Ok(Json(state.sessions.select_floor(&requester.id, payload.floor)?))
}

pub async fn session_count(
    State(state): State<ServerState>,
    requester: Requester,
    Json(payload): Json<CountInput>,
) -> AppResult<Json<AttendanceSession>> {
    Ok(Json(state.sessions.enter_count(&requester.id, &payload.text)?))
}

/// 备注可省略：`{}` 或 `{"notes": null}` 直接提交当前楼层
pub async fn session_notes(
    State(state): State<ServerState>,
    requester: Requester,
    Json(payload): Json<NotesInput>,
) -> AppResult<Json<AttendanceSession>> {
    let session = state
        .sessions
        .enter_notes(&requester.id, payload.notes)
        .await?;
    Ok(Json(session))
}

pub async fn session_cancel(
    State(state): State<ServerState>,
    requester: Requester,
) -> AppResult<Json<bool>> {
    state.sessions.cancel(&requester.id)?;
    Ok(Json(true))
}

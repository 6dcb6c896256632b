//! Duty API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::AppResult;
use shared::models::{DutyConfirm, DutyRecord, DutyReport, DutySkip, DutyView, QueueEntry, SkipOutcome};

use crate::api::{DateQuery, Requester};
use crate::core::ServerState;
use crate::duty::{ScheduleRun, SkipRequest};
use crate::utils::time;

/// GET /api/duties/today - 今日值日列表
///
/// 今日尚未生成时先生成。
pub async fn today(State(state): State<ServerState>) -> AppResult<Json<Vec<DutyView>>> {
    let date = state.scheduler.today();
    state.scheduler.ensure_schedule(date).await?;
    Ok(Json(state.scheduler.today_duties(date).await?))
}

/// POST /api/duties/generate?date= - 生成值日 (幂等)
pub async fn generate(
    State(state): State<ServerState>,
    requester: Requester,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<ScheduleRun>> {
    let date = time::date_or_today(query.date.as_deref(), state.clock.as_ref())?;
    tracing::info!(date = %date, requester = %requester.label(), "Schedule generation requested");
    Ok(Json(state.scheduler.ensure_schedule(date).await?))
}

/// GET /api/duties/floor/{floor}?date= - 某层值日
pub async fn by_floor(
    State(state): State<ServerState>,
    Path(floor): Path<i64>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<DutyView>> {
    let date = time::date_or_today(query.date.as_deref(), state.clock.as_ref())?;
    Ok(Json(state.scheduler.duty_for_floor(date, floor).await?))
}

/// POST /api/duties/confirm - 确认值日完成
///
/// 没有待确认的记录时返回 `null`，不报错。
pub async fn confirm(
    State(state): State<ServerState>,
    requester: Requester,
    Json(payload): Json<DutyConfirm>,
) -> AppResult<Json<Option<DutyRecord>>> {
    let date = time::date_or_today(payload.date.as_deref(), state.clock.as_ref())?;
    let record = state
        .scheduler
        .confirm(payload.room_number, &requester.label(), date)
        .await?;
    Ok(Json(record))
}

/// POST /api/duties/skip - 延期值日，交给下一个房间
pub async fn skip(
    State(state): State<ServerState>,
    requester: Requester,
    Json(payload): Json<DutySkip>,
) -> AppResult<Json<SkipOutcome>> {
    // 先校验楼层负责人，未授权的请求不产生任何写入
    state
        .scheduler
        .authorize_skip(&requester.id, payload.floor)
        .await?;

    // 再补齐今日值日，延期只影响之后的生成
    let date = state.scheduler.today();
    state.scheduler.ensure_schedule(date).await?;

    let outcome = state
        .scheduler
        .skip(SkipRequest {
            floor: payload.floor,
            room_number: payload.room_number,
            reason: payload.reason.as_deref(),
            requester_id: &requester.id,
            requester_name: requester.name.as_deref(),
            date,
        })
        .await?;
    Ok(Json(outcome))
}

/// GET /api/duties/queue - 延期队列
pub async fn queue(State(state): State<ServerState>) -> AppResult<Json<Vec<QueueEntry>>> {
    Ok(Json(state.scheduler.queued_rooms().await?))
}

/// GET /api/duties/report?date= - 值日日报
pub async fn report(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<DutyReport>> {
    let date = time::date_or_today(query.date.as_deref(), state.clock.as_ref())?;
    Ok(Json(state.scheduler.report(date).await?))
}

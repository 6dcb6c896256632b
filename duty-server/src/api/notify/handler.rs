//! Manual Notification Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{BroadcastRequest, BroadcastResult, NotifyResult};

use crate::api::Requester;
use crate::core::ServerState;
use crate::jobs::broadcast::broadcast_text;
use crate::jobs::{DailyJob, FloorTarget};

/// POST /api/notify/{job} - 立即执行每日任务，返回送达条数
pub async fn run_job(
    State(state): State<ServerState>,
    requester: Requester,
    Path(name): Path<String>,
) -> AppResult<Json<NotifyResult>> {
    let job = DailyJob::from_name(&name).ok_or_else(|| {
        AppError::with_message(ErrorCode::NotFound, format!("Unknown job '{name}'"))
            .with_detail("job", name.clone())
    })?;

    tracing::info!(job = job.name(), requester = %requester.label(), "Manual job run requested");
    let delivered = job.run_once(&state).await?;
    Ok(Json(NotifyResult {
        job: job.name().to_string(),
        delivered,
    }))
}

/// POST /api/notify/broadcast - 自定义文本发到楼层群组
pub async fn broadcast(
    State(state): State<ServerState>,
    requester: Requester,
    Json(payload): Json<BroadcastRequest>,
) -> AppResult<Json<BroadcastResult>> {
    let target = FloorTarget::parse(payload.target.as_deref())?;
    tracing::debug!(?target, requester = %requester.label(), "Broadcast requested");
    let result = broadcast_text(&state, target, &payload.text).await?;
    Ok(Json(result))
}

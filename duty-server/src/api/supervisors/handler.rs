//! Supervisor API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::AppResult;
use shared::models::{SupervisorCreate, SupervisorDetail};

use crate::api::Requester;
use crate::core::ServerState;

/// GET /api/supervisors - 负责人列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<SupervisorDetail>>> {
    Ok(Json(state.registry.supervisors().await?))
}

/// POST /api/supervisors - 登记负责人
///
/// 同一 identity 再次登记时更新姓名并替换楼层。
pub async fn register(
    State(state): State<ServerState>,
    requester: Requester,
    Json(payload): Json<SupervisorCreate>,
) -> AppResult<Json<SupervisorDetail>> {
    let detail = state
        .registry
        .register_supervisor(payload, state.clock.now_millis())
        .await?;
    tracing::debug!(identity = %detail.supervisor.identity, requester = %requester.label(), "Supervisor registration requested");
    Ok(Json(detail))
}

/// DELETE /api/supervisors/{id} - 删除负责人
pub async fn remove(
    State(state): State<ServerState>,
    requester: Requester,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.registry.delete_supervisor(id).await?;
    tracing::debug!(supervisor_id = id, requester = %requester.label(), "Supervisor deletion requested");
    Ok(Json(true))
}

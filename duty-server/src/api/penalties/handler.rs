//! Penalty API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::error::AppResult;
use shared::models::{Penalty, PenaltyIssue};

use crate::api::Requester;
use crate::core::ServerState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub room: Option<i64>,
}

/// POST /api/penalties - 登记处罚 (不影响值日权重)
pub async fn issue(
    State(state): State<ServerState>,
    requester: Requester,
    Json(payload): Json<PenaltyIssue>,
) -> AppResult<Json<Penalty>> {
    let penalty = state
        .penalties
        .issue(
            payload.room_number,
            payload.duration_days,
            payload.reason.as_deref(),
            &requester.label(),
        )
        .await?;
    Ok(Json(penalty))
}

/// GET /api/penalties?room= - 处罚列表，新的在前
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Penalty>>> {
    Ok(Json(state.penalties.list(query.room).await?))
}

//! Floor / Room API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::AppResult;
use shared::models::{Floor, FloorGroupUpdate, Room, RoomWeightUpdate};

use crate::api::Requester;
use crate::core::ServerState;

/// GET /api/floors - 楼层列表
pub async fn list_floors(State(state): State<ServerState>) -> AppResult<Json<Vec<Floor>>> {
    Ok(Json(state.registry.floors().await?))
}

/// PUT /api/floors/{id}/group - 设置值日公告群组
pub async fn set_group(
    State(state): State<ServerState>,
    requester: Requester,
    Path(id): Path<i64>,
    Json(payload): Json<FloorGroupUpdate>,
) -> AppResult<Json<Floor>> {
    let floor = state.registry.set_floor_group(id, payload.group_chat_id).await?;
    tracing::debug!(floor = id, requester = %requester.label(), "Floor group change requested");
    Ok(Json(floor))
}

/// GET /api/floors/{id}/rooms - 楼层房间 (按房号升序)
pub async fn list_rooms(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Room>>> {
    Ok(Json(state.registry.rooms(id).await?))
}

/// PUT /api/rooms/{number}/weight - 修改值日权重
pub async fn update_weight(
    State(state): State<ServerState>,
    requester: Requester,
    Path(number): Path<i64>,
    Json(payload): Json<RoomWeightUpdate>,
) -> AppResult<Json<Room>> {
    let room = state
        .registry
        .update_room_weight(number, payload.duty_weight)
        .await?;
    tracing::debug!(room = number, requester = %requester.label(), "Room weight change requested");
    Ok(Json(room))
}

//! 楼层 / 房间 API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/floors | GET | 楼层列表 |
//! | /api/floors/{id}/group | PUT | 设置楼层群组 |
//! | /api/floors/{id}/rooms | GET | 楼层房间列表 |
//! | /api/rooms/{number}/weight | PUT | 修改值日权重 |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/floors", floor_routes())
        .nest("/api/rooms", room_routes())
}

fn floor_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_floors))
        .route("/{id}/group", put(handler::set_group))
        .route("/{id}/rooms", get(handler::list_rooms))
}

fn room_routes() -> Router<ServerState> {
    Router::new().route("/{number}/weight", put(handler::update_weight))
}

//! 楼层负责人 API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/supervisors | GET | 负责人列表 |
//! | /api/supervisors | POST | 登记 / 重新登记负责人 |
//! | /api/supervisors/{id} | DELETE | 删除负责人 |

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/supervisors", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::register))
        .route("/{id}", delete(handler::remove))
}

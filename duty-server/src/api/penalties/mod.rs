//! 处罚 API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/penalties | POST | 登记处罚 |
//! | /api/penalties?room= | GET | 处罚列表 (可按房间过滤) |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/penalties", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::list).post(handler::issue))
}

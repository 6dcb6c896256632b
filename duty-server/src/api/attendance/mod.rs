//! 考勤 API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/attendance | POST | 提交某层人数 (覆盖同日同层) |
//! | /api/attendance | GET | 某日考勤记录 |
//! | /api/attendance/report | GET | 考勤日报 |
//! | /api/attendance/session/start | POST | 开始分步录入 |
//! | /api/attendance/session/floor | POST | 选择楼层 |
//! | /api/attendance/session/count | POST | 输入人数 |
//! | /api/attendance/session/notes | POST | 输入备注并提交当前楼层 |
//! | /api/attendance/session/cancel | POST | 放弃录入 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/attendance", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::submit))
        .route("/report", get(handler::report))
        .route("/session/start", post(handler::session_start))
        .route("/session/floor", post(handler::session_floor))
        .route("/session/count", post(handler::session_count))
        .route("/session/notes", post(handler::session_notes))
        .route("/session/cancel", post(handler::session_cancel))
}

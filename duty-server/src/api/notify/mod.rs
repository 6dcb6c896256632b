//! 手动推送 API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/notify/broadcast | POST | 自定义文本群发 (全部楼层或楼层范围) |
//! | /api/notify/{job} | POST | 立即执行一个每日任务 |
//!
//! `{job}`: `duty_announcement` / `attendance_request` / `duty_report` / `attendance_report`

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notify", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/broadcast", post(handler::broadcast))
        .route("/{job}", post(handler::run_job))
}

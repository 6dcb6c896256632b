//! 值日 API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/duties/today | GET | 今日值日 (按需生成) |
//! | /api/duties/generate | POST | 生成指定日期的值日 |
//! | /api/duties/floor/{floor} | GET | 某层某日的值日 |
//! | /api/duties/confirm | POST | 确认完成 |
//! | /api/duties/skip | POST | 延期 (仅楼层负责人) |
//! | /api/duties/queue | GET | 延期队列 |
//! | /api/duties/report | GET | 值日日报 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/duties", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/today", get(handler::today))
        .route("/generate", post(handler::generate))
        .route("/floor/{floor}", get(handler::by_floor))
        .route("/confirm", post(handler::confirm))
        .route("/skip", post(handler::skip))
        .route("/queue", get(handler::queue))
        .route("/report", get(handler::report))
}

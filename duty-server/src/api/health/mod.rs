//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 健康检查 + 今日日期 + 推送统计 | 无 |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::notify::DeliveryStats;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// 业务日期 (YYYY-MM-DD)
    today: String,
    timezone: String,
    notifier: &'static str,
    deliveries: DeliveryStats,
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        today: state.clock.today().format("%Y-%m-%d").to_string(),
        timezone: state.config.timezone.to_string(),
        notifier: state.broadcaster.notifier_name(),
        deliveries: state.broadcaster.stats(),
    })
}

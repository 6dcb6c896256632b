//! 统计路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/stats?date= | GET | 当日值日完成情况 + 处罚总数 (只读，不生成值日) |

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use shared::error::AppResult;
use shared::models::DutyStats;

use crate::api::DateQuery;
use crate::core::ServerState;
use crate::duty::report;
use crate::utils::time;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/stats", get(stats))
}

async fn stats(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<DutyStats>> {
    let date = time::date_or_today(query.date.as_deref(), state.clock.as_ref())?;
    let duty_report = state.scheduler.report(date).await?;
    let total_penalties = state.penalties.count().await?;
    Ok(Json(report::stats(&duty_report, total_penalties)))
}

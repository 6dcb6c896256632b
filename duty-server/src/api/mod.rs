//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`duties`] - 值日查询 / 确认 / 延期
//! - [`attendance`] - 考勤提交与录入会话
//! - [`penalties`] - 处罚
//! - [`floors`] - 楼层和房间管理
//! - [`supervisors`] - 楼层负责人管理
//! - [`notify`] - 手动推送 / 群发
//! - [`stats`] - 当日统计

pub mod requester;

pub mod attendance;
pub mod duties;
pub mod floors;
pub mod health;
pub mod notify;
pub mod penalties;
pub mod stats;
pub mod supervisors;

use axum::Router;
use http::{HeaderName, HeaderValue};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub use requester::Requester;

/// `?date=YYYY-MM-DD` (defaults to today)
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(duties::router())
        .merge(attendance::router())
        .merge(penalties::router())
        .merge(floors::router())
        .merge(supervisors::router())
        .merge(notify::router())
        .merge(stats::router())
}

/// Build the application used by the HTTP server and by integration tests
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .with_state(state)
}

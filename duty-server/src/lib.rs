//! Dormitory Duty Server - 宿舍值日轮换服务
//!
//! # 架构概述
//!
//! - **值日调度** (`duty`): 按楼层轮换生成每日值日，延期队列优先
//! - **考勤** (`attendance`): 每层每日人数台账 + 分步录入会话
//! - **处罚** (`penalty`): 值日延长记录，仅供报表
//! - **登记** (`registry`): 楼层、房间、楼层负责人
//! - **推送** (`notify`, `jobs`): 每日公告、提醒和日报
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! duty-server/src/
//! ├── core/          # 配置、状态、错误、后台任务
//! ├── db/            # SQLite 连接池、迁移、仓储
//! ├── duty/          # 轮换算法、调度、日报
//! ├── attendance/    # 考勤台账、录入会话
//! ├── notify/        # 推送通道
//! ├── jobs/          # 每日定时任务
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、时钟、校验
//! ```

pub mod api;
pub mod attendance;
pub mod core;
pub mod db;
pub mod duty;
pub mod jobs;
pub mod notify;
pub mod penalty;
pub mod registry;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use duty::{DutyScheduler, ScheduleRun};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 按配置初始化日志
pub fn setup_environment(config: &Config) {
    init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        config.log_dir.as_deref(),
    );
}

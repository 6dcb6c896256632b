//! 推送任务
//!
//! - [`daily`] - 每日定时任务 (也可由管理员手动触发)
//! - [`broadcast`] - 管理员自定义文本群发

pub mod broadcast;
pub mod daily;

pub use broadcast::FloorTarget;
pub use daily::{DailyJob, DailyJobs};

//! 每日定时任务调度器
//!
//! 在配置的本地时刻触发：值日公告、考勤提醒、值日日报、考勤日报。
//! 每个任务独立循环：sleep 到下一次触发点，执行，再计算下一次；
//! 收到关机信号立即退出。推送失败只记日志，不影响已提交的数据。

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use chrono::NaiveTime;
use shared::error::AppResult;
use shared::models::DutyView;
use tokio_util::sync::CancellationToken;

use crate::core::ServerState;
use crate::notify::message;
use crate::utils::time;

pub type JobFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyJob {
    DutyAnnouncement,
    AttendanceRequest,
    DutyReport,
    AttendanceReport,
}

impl DailyJob {
    pub const ALL: [DailyJob; 4] = [
        DailyJob::DutyAnnouncement,
        DailyJob::AttendanceRequest,
        DailyJob::DutyReport,
        DailyJob::AttendanceReport,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DailyJob::DutyAnnouncement => "duty_announcement",
            DailyJob::AttendanceRequest => "attendance_request",
            DailyJob::DutyReport => "duty_report",
            DailyJob::AttendanceReport => "attendance_report",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|job| job.name() == name)
    }

    fn at(self, state: &ServerState) -> NaiveTime {
        let config = &state.config;
        match self {
            DailyJob::DutyAnnouncement => config.duty_announce_at,
            DailyJob::AttendanceRequest => config.attendance_request_at,
            DailyJob::DutyReport => config.duty_report_at,
            DailyJob::AttendanceReport => config.attendance_report_at,
        }
    }

    /// Run once; returns the number of messages delivered
    pub async fn run_once(self, state: &ServerState) -> AppResult<usize> {
        match self {
            DailyJob::DutyAnnouncement => announce_duties(state).await,
            DailyJob::AttendanceRequest => request_attendance(state).await,
            DailyJob::DutyReport => send_duty_report(state).await,
            DailyJob::AttendanceReport => send_attendance_report(state).await,
        }
    }
}

/// 每日任务集合
///
/// 注册为 `TaskKind::Periodic`，在 `start_background_tasks()` 中启动。
pub struct DailyJobs {
    state: ServerState,
    shutdown: CancellationToken,
}

impl DailyJobs {
    pub fn new(state: ServerState, shutdown: CancellationToken) -> Self {
        Self { state, shutdown }
    }

    pub fn into_tasks(self) -> Vec<(&'static str, JobFuture)> {
        DailyJob::ALL
            .into_iter()
            .map(|job| {
                let state = self.state.clone();
                let shutdown = self.shutdown.clone();
                let fut: JobFuture = Box::pin(run_loop(job, state, shutdown));
                (job.name(), fut)
            })
            .collect()
    }
}

async fn run_loop(job: DailyJob, state: ServerState, shutdown: CancellationToken) {
    let at = job.at(&state);
    let tz = state.config.timezone;
    tracing::info!(job = job.name(), at = %at.format("%H:%M"), "Daily job started");

    loop {
        let sleep_duration = time::duration_until_next(at, tz);
        tracing::debug!(
            job = job.name(),
            "Next run in {} minutes",
            sleep_duration.as_secs() / 60
        );

        tokio::select! {
            _ = tokio::time::sleep(sleep_duration) => {
                match job.run_once(&state).await {
                    Ok(delivered) => tracing::info!(job = job.name(), delivered, "Daily job finished"),
                    Err(e) => tracing::error!(job = job.name(), error = %e, "Daily job failed"),
                }
            }
            _ = shutdown.cancelled() => {
                tracing::info!(job = job.name(), "Daily job received shutdown signal");
                return;
            }
        }
    }
}

/// 生成今日值日并按楼层群组推送
///
/// 同一群组的多个楼层合并为一条消息；没有群组的楼层不推送。
pub async fn announce_duties(state: &ServerState) -> AppResult<usize> {
    let run = state.scheduler.ensure_today_schedule().await?;
    let today = state.scheduler.today();
    let duties = state.scheduler.today_duties(today).await?;
    let floors = state.registry.floors().await?;

    let mut by_group: BTreeMap<String, Vec<DutyView>> = BTreeMap::new();
    for floor in &floors {
        let Some(group) = &floor.group_chat_id else {
            tracing::debug!(floor = floor.id, "Floor has no group chat, announcement skipped");
            continue;
        };
        let views = duties
            .iter()
            .filter(|v| v.record.floor == floor.id)
            .cloned();
        by_group.entry(group.clone()).or_default().extend(views);
    }

    let mut delivered = 0;
    for (group, views) in &by_group {
        let text = message::duty_announcement(&run.date, views);
        if state.broadcaster.send(group, &text).await {
            delivered += 1;
        }
    }
    Ok(delivered)
}

/// 提醒每位楼层负责人提交考勤
pub async fn request_attendance(state: &ServerState) -> AppResult<usize> {
    let date = state.clock.today().format("%Y-%m-%d").to_string();
    let supervisors = state.registry.supervisors().await?;

    let mut delivered = 0;
    for detail in &supervisors {
        let text = message::attendance_request(&date, &detail.floors);
        if state.broadcaster.send(&detail.supervisor.identity, &text).await {
            delivered += 1;
        }
    }
    Ok(delivered)
}

pub async fn send_duty_report(state: &ServerState) -> AppResult<usize> {
    let Some(admin) = &state.config.admin_chat_id else {
        tracing::warn!("ADMIN_CHAT_ID not set, duty report skipped");
        return Ok(0);
    };
    let report = state.scheduler.report(state.clock.today()).await?;
    let text = message::duty_report(&report);
    Ok(usize::from(state.broadcaster.send(admin, &text).await))
}

pub async fn send_attendance_report(state: &ServerState) -> AppResult<usize> {
    let Some(admin) = &state.config.admin_chat_id else {
        tracing::warn!("ADMIN_CHAT_ID not set, attendance report skipped");
        return Ok(0);
    };
    let report = state.attendance.report(state.clock.today()).await?;
    let text = message::attendance_report(&report);
    Ok(usize::from(state.broadcaster.send(admin, &text).await))
}

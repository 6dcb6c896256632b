use std::sync::Arc;

use shared::error::AppError;
use sqlx::SqlitePool;

use crate::attendance::{AttendanceLedger, SessionStore};
use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::DbService;
use crate::duty::DutyScheduler;
use crate::jobs::DailyJobs;
use crate::notify::{Broadcaster, LogNotifier, Notifier, TelegramNotifier};
use crate::penalty::PenaltyLedger;
use crate::registry::Registry;
use crate::utils::time::{SharedClock, SystemClock};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是 Arc 或连接池句柄，Clone 成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | 数据库连接池 |
/// | clock | SharedClock | 业务时钟 |
/// | scheduler | DutyScheduler | 值日调度 |
/// | attendance | AttendanceLedger | 考勤台账 |
/// | sessions | SessionStore | 考勤录入会话 |
/// | penalties | PenaltyLedger | 处罚台账 |
/// | registry | Registry | 楼层/房间/负责人 |
/// | broadcaster | Broadcaster | 消息推送 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub clock: SharedClock,
    pub scheduler: DutyScheduler,
    pub attendance: AttendanceLedger,
    pub sessions: SessionStore,
    pub penalties: PenaltyLedger,
    pub registry: Registry,
    pub broadcaster: Broadcaster,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`initialize()`](Self::initialize) 方法代替；测试中用于注入时钟和消息接收方
    pub fn new(
        config: Config,
        pool: SqlitePool,
        clock: SharedClock,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let attendance = AttendanceLedger::new(pool.clone(), clock.clone());
        Self {
            scheduler: DutyScheduler::new(pool.clone(), clock.clone()),
            sessions: SessionStore::new(pool.clone(), attendance.clone()),
            attendance,
            penalties: PenaltyLedger::new(pool.clone(), clock.clone()),
            registry: Registry::new(pool.clone()),
            broadcaster: Broadcaster::new(notifier),
            config,
            pool,
            clock,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录
    /// 2. 数据库 (迁移 + 首次启动时初始化楼层/房间)
    /// 3. 消息推送 (有 token 用 Telegram，否则只写日志)
    /// 4. 各服务
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = if config.database_path == ":memory:" {
            DbService::in_memory().await?
        } else {
            config
                .ensure_work_dir()
                .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;
            DbService::new(&config.database_path).await?
        };

        db.seed_registry(
            config.lowest_floor,
            config.highest_floor,
            config.rooms_per_floor,
        )
        .await?;

        let notifier: Arc<dyn Notifier> = match &config.telegram_bot_token {
            Some(token) => {
                let telegram = TelegramNotifier::new(token.clone(), config.telegram_api_base.as_deref())
                    .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;
                tracing::info!("Notifications via Telegram Bot API");
                Arc::new(telegram)
            }
            None => {
                tracing::warn!("TELEGRAM_BOT_TOKEN not set, notifications are written to the log only");
                Arc::new(LogNotifier)
            }
        };

        let clock: SharedClock = Arc::new(SystemClock::new(config.timezone));
        tracing::info!(
            timezone = %config.timezone,
            today = %clock.today(),
            "Business clock ready"
        );

        Ok(Self::new(config.clone(), db.pool, clock, notifier))
    }

    /// 启动后台任务
    ///
    /// 启动的任务：
    /// - 启动时补齐今日值日 (Warmup)
    /// - 每日公告 / 提醒 / 日报 (Periodic，可通过 ENABLE_DAILY_JOBS 关闭)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let scheduler = self.scheduler.clone();
        tasks.spawn("schedule_warmup", TaskKind::Warmup, async move {
            if let Err(e) = scheduler.ensure_today_schedule().await {
                tracing::error!(error = %e, "Startup schedule generation failed");
            }
        });

        if self.config.enable_daily_jobs {
            let jobs = DailyJobs::new(self.clone(), tasks.shutdown_token());
            for (name, job) in jobs.into_tasks() {
                tasks.spawn(name, TaskKind::Periodic, job);
            }
        } else {
            tracing::info!("Daily jobs disabled");
        }

        tasks.log_summary();
        tasks
    }
}

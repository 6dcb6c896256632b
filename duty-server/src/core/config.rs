use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::utils::time;

/// 服务器配置 - 值日服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖（无法解析时使用默认值）：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/dorm-duty | 工作目录 |
/// | DATABASE_PATH | {WORK_DIR}/duty.db | SQLite 数据库文件 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | TIMEZONE | Asia/Tashkent | 业务时区 (IANA) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志目录 (按天滚动) |
/// | LOG_JSON | false | JSON 格式日志 |
/// | ADMIN_CHAT_ID | - | 管理员会话 (日报接收方) |
/// | TELEGRAM_BOT_TOKEN | - | 机器人 token，未设置时只写日志 |
/// | TELEGRAM_API_BASE | https://api.telegram.org | Bot API 地址 |
/// | LOWEST_FLOOR | 2 | 初始化楼层下限 |
/// | HIGHEST_FLOOR | 9 | 初始化楼层上限 |
/// | ROOMS_PER_FLOOR | 12 | 每层房间数 |
/// | DUTY_ANNOUNCE_AT | 21:00 | 值日公告时间 |
/// | ATTENDANCE_REQUEST_AT | 22:00 | 考勤提醒时间 |
/// | DUTY_REPORT_AT | 23:00 | 值日日报时间 |
/// | ATTENDANCE_REPORT_AT | 23:05 | 考勤日报时间 |
/// | ENABLE_DAILY_JOBS | true | 是否启用定时任务 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/duty HTTP_PORT=8080 TIMEZONE=Europe/Berlin cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    pub database_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 业务时区，决定"今天"是哪一天
    pub timezone: Tz,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub log_json: bool,

    // === 消息推送 ===
    pub admin_chat_id: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_api_base: Option<String>,

    // === 首次启动的楼层/房间初始化 ===
    pub lowest_floor: i64,
    pub highest_floor: i64,
    pub rooms_per_floor: i64,

    // === 每日定时任务 (业务时区) ===
    pub duty_announce_at: NaiveTime,
    pub attendance_request_at: NaiveTime,
    pub duty_report_at: NaiveTime,
    pub attendance_report_at: NaiveTime,
    pub enable_daily_jobs: bool,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_time(key: &str, hour: u32, min: u32) -> NaiveTime {
    env_opt(key)
        .and_then(|v| time::parse_hhmm(&v).ok())
        .or_else(|| NaiveTime::from_hms_opt(hour, min, 0))
        .unwrap_or(NaiveTime::MIN)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = env_opt("WORK_DIR").unwrap_or_else(|| "/var/lib/dorm-duty".into());
        let database_path = env_opt("DATABASE_PATH").unwrap_or_else(|| {
            PathBuf::from(&work_dir)
                .join("duty.db")
                .to_string_lossy()
                .into_owned()
        });

        Self {
            work_dir,
            database_path,
            http_port: env_parse("HTTP_PORT", 3000),
            timezone: env_parse("TIMEZONE", chrono_tz::Asia::Tashkent),
            log_level: env_opt("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: env_opt("LOG_DIR"),
            log_json: env_parse("LOG_JSON", false),

            admin_chat_id: env_opt("ADMIN_CHAT_ID"),
            telegram_bot_token: env_opt("TELEGRAM_BOT_TOKEN"),
            telegram_api_base: env_opt("TELEGRAM_API_BASE"),

            lowest_floor: env_parse("LOWEST_FLOOR", 2),
            highest_floor: env_parse("HIGHEST_FLOOR", 9),
            rooms_per_floor: env_parse("ROOMS_PER_FLOOR", 12),

            duty_announce_at: env_time("DUTY_ANNOUNCE_AT", 21, 0),
            attendance_request_at: env_time("ATTENDANCE_REQUEST_AT", 22, 0),
            duty_report_at: env_time("DUTY_REPORT_AT", 23, 0),
            attendance_report_at: env_time("ATTENDANCE_REPORT_AT", 23, 5),
            enable_daily_jobs: env_parse("ENABLE_DAILY_JOBS", true),
        }
    }

    /// 测试配置：内存数据库路径占位、关闭定时任务
    ///
    /// 常用于测试场景
    pub fn for_tests() -> Self {
        let mut config = Self::from_env();
        config.work_dir = std::env::temp_dir().to_string_lossy().into_owned();
        config.database_path = ":memory:".into();
        config.admin_chat_id = Some("admin".into());
        config.telegram_bot_token = None;
        config.enable_daily_jobs = false;
        config
    }

    /// 确保工作目录存在
    pub fn ensure_work_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)?;
        if let Some(parent) = PathBuf::from(&self.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

//! 时间工具函数: 业务时区与时钟
//!
//! 业务日期一律按配置时区 (默认 Asia/Tashkent) 计算，
//! 存储为 `YYYY-MM-DD` 文本；时间戳为 `i64` Unix millis。

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Datelike, NaiveDate, NaiveTime};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// Source of "today" and "now"
///
/// Everything that depends on the current date takes a clock so tests can
/// pin the calendar.
pub trait Clock: Send + Sync {
    /// Current business date in the configured timezone
    fn today(&self) -> NaiveDate;

    /// Current instant as Unix millis
    fn now_millis(&self) -> i64;
}

pub type SharedClock = Arc<dyn Clock>;

/// Wall clock in a fixed timezone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Utc::now().with_timezone(&self.tz).date_naive()
    }

    fn now_millis(&self) -> i64 {
        shared::util::now_millis()
    }
}

/// Clock pinned to a date, for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    day: AtomicI64,
    millis: AtomicI64,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            day: AtomicI64::new(date.num_days_from_ce() as i64),
            millis: AtomicI64::new(0),
        }
    }

    pub fn set_date(&self, date: NaiveDate) {
        self.day.store(date.num_days_from_ce() as i64, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        let days = self.day.load(Ordering::SeqCst) as i32;
        NaiveDate::from_num_days_from_ce_opt(days).unwrap_or(NaiveDate::MIN)
    }

    /// Increments on every call so successive events stay ordered
    fn now_millis(&self) -> i64 {
        self.millis.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Optional request date, defaulting to the clock's today
pub fn date_or_today(date: Option<&str>, clock: &dyn Clock) -> AppResult<NaiveDate> {
    match date {
        Some(d) => parse_date(d),
        None => Ok(clock.today()),
    }
}

/// 解析时刻字符串 (HH:MM)
pub fn parse_hhmm(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time of day: {}", value)))
}

/// 距离下一次 `at` 时刻的 Duration (业务时区)
///
/// 今天的时刻已过则等到明天同一时刻。DST gap 时回退到 UTC 解释。
pub fn duration_until_next(at: NaiveTime, tz: Tz) -> std::time::Duration {
    let now = chrono::Utc::now().with_timezone(&tz);
    let today = now.date_naive();

    let target_date = if now.time() >= at {
        today + chrono::Duration::days(1)
    } else {
        today
    };

    let naive = target_date.and_time(at);
    let target_millis = naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis());

    let diff = target_millis - now.timestamp_millis();
    std::time::Duration::from_millis(diff.max(1000) as u64)
}

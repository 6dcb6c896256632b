//! 文本输入校验
//!
//! SQLite TEXT 不限制长度，写库前在这里统一检查。长度按字符计。

use shared::error::{AppError, AppResult};

/// 姓名 (负责人、请求者)
pub const MAX_NAME_LEN: usize = 200;

/// 备注和原因 (延期原因、处罚原因、考勤备注)
pub const MAX_NOTE_LEN: usize = 500;

/// 手动推送的消息正文 (Telegram 单条上限 4096)
pub const MAX_MESSAGE_LEN: usize = 4000;

/// 短标识 (用户 id、群组 id)
pub const MAX_SHORT_TEXT_LEN: usize = 100;

fn check_len(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Non-blank and at most `max_len` chars
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    check_len(value, field, max_len)
}

pub fn validate_optional_text(value: Option<&str>, field: &str, max_len: usize) -> AppResult<()> {
    value.map_or(Ok(()), |v| check_len(v, field, max_len))
}

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Audit string stored in `recorded_by` / `confirmed_by` / `issued_by` columns.
///
/// Format: `"{id}:{name}"`, or just the id when no display name is known.
pub fn actor_label(id: &str, name: Option<&str>) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("{id}:{name}"),
        None => id.to_string(),
    }
}

//! 手动群发
//!
//! 管理员输入的文本推送到楼层群组。多个楼层共用一个群组时只发一次。

use std::collections::BTreeSet;

use shared::error::{AppError, AppResult};
use shared::models::BroadcastResult;

use crate::core::ServerState;
use crate::utils::validation::{MAX_MESSAGE_LEN, validate_required_text};

/// Floors addressed by a broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorTarget {
    All,
    /// Inclusive
    Range { from: i64, to: i64 },
}

impl FloorTarget {
    /// `None`, `""` or `"all"` → all floors; `"4"` → one floor; `"2-3"` → range
    pub fn parse(value: Option<&str>) -> AppResult<Self> {
        let value = value.map(str::trim).unwrap_or_default();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let invalid = || AppError::validation(format!("Invalid floor target '{value}'"));
        let parse_floor = |s: &str| s.trim().parse::<i64>().map_err(|_| invalid());

        let (from, to) = match value.split_once('-') {
            Some((from, to)) => (parse_floor(from)?, parse_floor(to)?),
            None => {
                let floor = parse_floor(value)?;
                (floor, floor)
            }
        };
        if from > to {
            return Err(invalid());
        }
        Ok(Self::Range { from, to })
    }

    pub fn contains(self, floor: i64) -> bool {
        match self {
            Self::All => true,
            Self::Range { from, to } => (from..=to).contains(&floor),
        }
    }
}

/// Send `text` once to every group chat of the targeted floors
pub async fn broadcast_text(
    state: &ServerState,
    target: FloorTarget,
    text: &str,
) -> AppResult<BroadcastResult> {
    validate_required_text(text, "text", MAX_MESSAGE_LEN)?;

    let groups: BTreeSet<String> = state
        .registry
        .floors()
        .await?
        .into_iter()
        .filter(|floor| target.contains(floor.id))
        .filter_map(|floor| floor.group_chat_id)
        .collect();

    let mut delivered = 0;
    for group in &groups {
        if state.broadcaster.send(group, text).await {
            delivered += 1;
        }
    }

    tracing::info!(?target, groups = groups.len(), delivered, "Custom broadcast sent");
    Ok(BroadcastResult {
        groups: groups.len(),
        delivered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::db::DbService;
    use crate::notify::RecordingNotifier;
    use crate::utils::time::FixedClock;
    use chrono::NaiveDate;
    use shared::error::ErrorCode;
    use std::sync::Arc;

    #[test]
    fn test_parse_target() {
        assert_eq!(FloorTarget::parse(None).unwrap(), FloorTarget::All);
        assert_eq!(FloorTarget::parse(Some(" ALL ")).unwrap(), FloorTarget::All);
        assert_eq!(
            FloorTarget::parse(Some("2-3")).unwrap(),
            FloorTarget::Range { from: 2, to: 3 }
        );
        assert_eq!(
            FloorTarget::parse(Some("4")).unwrap(),
            FloorTarget::Range { from: 4, to: 4 }
        );

        for bad in ["x-3", "4-2", "2-", "-1", "2-3-4"] {
            let err = FloorTarget::parse(Some(bad)).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationFailed, "{bad}");
        }
    }

    #[tokio::test]
    async fn test_shared_group_gets_one_message() {
        let db = DbService::in_memory().await.unwrap();
        db.seed_registry(2, 5, 12).await.unwrap();
        let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2026, 4, 10).unwrap()));
        let sink = Arc::new(RecordingNotifier::default());
        let state = ServerState::new(Config::for_tests(), db.pool, clock, sink.clone());
        for (floor, group) in [(2, "-23"), (3, "-23"), (4, "-45")] {
            state.registry.set_floor_group(floor, Some(group.into())).await.unwrap();
        }

        let result = broadcast_text(&state, FloorTarget::All, "water is off").await.unwrap();
        assert_eq!(result, BroadcastResult { groups: 2, delivered: 2 });

        let target = FloorTarget::parse(Some("3-5")).unwrap();
        let result = broadcast_text(&state, target, "meeting at 20:00").await.unwrap();
        assert_eq!(result, BroadcastResult { groups: 2, delivered: 2 });

        sink.fail_for("-45");
        let target = FloorTarget::parse(Some("4-5")).unwrap();
        let result = broadcast_text(&state, target, "again").await.unwrap();
        assert_eq!(result, BroadcastResult { groups: 1, delivered: 0 });

        assert_eq!(sink.sent_to("-23"), vec!["water is off", "meeting at 20:00"]);

        let err = broadcast_text(&state, FloorTarget::All, "  ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}

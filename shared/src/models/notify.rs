//! Notification Models (手动推送)

use serde::{Deserialize, Serialize};

/// Result of a manually triggered daily job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotifyResult {
    pub job: String,
    /// Messages the sink accepted
    pub delivered: usize,
}

/// Free text sent to floor group chats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastRequest {
    pub text: String,
    /// `"all"` (default), a single floor `"4"` or an inclusive range `"2-3"`
    #[serde(default)]
    pub target: Option<String>,
}

/// Result of a custom broadcast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BroadcastResult {
    /// Distinct group chats addressed
    pub groups: usize,
    pub delivered: usize,
}

//! In-process sinks: log-only delivery and a recorder for tests

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use super::Notifier;

/// Writes every message to the log; used when no bot token is configured
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, recipient: &str, text: &str) -> bool {
        tracing::info!(recipient, "{}", text);
        true
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Keeps delivered messages in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    failing: Mutex<HashSet<String>>,
    attempts: AtomicU64,
}

impl RecordingNotifier {
    /// Make deliveries to `recipient` fail
    pub fn fail_for(&self, recipient: &str) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(recipient.to_string());
        }
    }

    /// Delivered `(recipient, text)` pairs, in order
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn sent_to(&self, recipient: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(r, _)| r == recipient)
            .map(|(_, text)| text)
            .collect()
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, recipient: &str, text: &str) -> bool {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        let fails = self
            .failing
            .lock()
            .map(|f| f.contains(recipient))
            .unwrap_or(false);
        if fails {
            return false;
        }
        match self.sent.lock() {
            Ok(mut sent) => {
                sent.push((recipient.to_string(), text.to_string()));
                true
            }
            Err(_) => false,
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

//! Notification delivery (消息推送)
//!
//! The core only needs `deliver(recipient, text) -> bool`. [`Broadcaster`]
//! wraps a notifier with delivery counters; failures are logged and counted,
//! never retried, and never roll back the state change that triggered them.

pub mod memory;
pub mod message;
pub mod telegram;

pub use memory::{LogNotifier, RecordingNotifier};
pub use telegram::TelegramNotifier;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Serialize;

/// Messaging sink
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `text` to `recipient`; `true` when the sink accepted it
    async fn deliver(&self, recipient: &str, text: &str) -> bool;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryStats {
    pub delivered: u64,
    pub failed: u64,
}

#[derive(Default)]
struct Counters {
    delivered: AtomicU64,
    failed: AtomicU64,
}

#[derive(Clone)]
pub struct Broadcaster {
    notifier: Arc<dyn Notifier>,
    counters: Arc<Counters>,
}

impl Broadcaster {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            counters: Arc::new(Counters::default()),
        }
    }

    pub async fn send(&self, recipient: &str, text: &str) -> bool {
        let ok = self.notifier.deliver(recipient, text).await;
        if ok {
            self.counters.delivered.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(recipient, sink = self.notifier.name(), "Message delivered");
        } else {
            self.counters.failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(recipient, sink = self.notifier.name(), "Message delivery failed");
        }
        ok
    }

    pub fn notifier_name(&self) -> &'static str {
        self.notifier.name()
    }

    pub fn stats(&self) -> DeliveryStats {
        DeliveryStats {
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }
}

//! Data models
//!
//! Shared between duty-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.

pub mod attendance;
pub mod duty;
pub mod floor;
pub mod notify;
pub mod penalty;
pub mod room;
pub mod supervisor;

// Re-exports
pub use attendance::*;
pub use duty::*;
pub use floor::*;
pub use notify::*;
pub use penalty::*;
pub use room::*;
pub use supervisor::*;

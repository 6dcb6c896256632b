//! Floor Model (楼层)

use serde::{Deserialize, Serialize};

/// Floor entity - a building level owning a set of rooms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Floor {
    pub id: i64,
    /// Group chat that receives this floor's duty announcement
    pub group_chat_id: Option<String>,
}

/// Update a floor's announcement group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorGroupUpdate {
    /// `None` detaches the floor from any group chat
    pub group_chat_id: Option<String>,
}

//! Room Model (房间)

use serde::{Deserialize, Serialize};

/// Upper bound for `duty_weight`; the rotation expands weights into slots
pub const MAX_DUTY_WEIGHT: i64 = 10;

/// Room entity
///
/// `number` is derived as `floor * 100 + index` and is unique across the
/// building. Only `duty_weight` may change after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Room {
    pub number: i64,
    pub floor: i64,
    /// Consecutive rotation slots this room occupies (1..=MAX_DUTY_WEIGHT)
    pub duty_weight: i64,
}

impl Room {
    /// Index of the room within its floor (1-based)
    pub fn index(&self) -> i64 {
        self.number - self.floor * 100
    }

    /// Derive a room number from floor and in-floor index
    pub fn number_for(floor: i64, index: i64) -> i64 {
        floor * 100 + index
    }
}

/// Update a room's duty weight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomWeightUpdate {
    pub duty_weight: i64,
}

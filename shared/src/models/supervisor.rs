//! Floor Supervisor Model (楼层负责人)

use serde::{Deserialize, Serialize};

/// Supervisor row (without floor assignments)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Supervisor {
    pub id: i64,
    /// External identity (messenger user id) used for authorization
    pub identity: String,
    pub name: String,
    pub created_at: i64,
}

/// Supervisor with the floors they are responsible for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupervisorDetail {
    #[serde(flatten)]
    pub supervisor: Supervisor,
    /// Assigned floors, ascending
    pub floors: Vec<i64>,
}

impl SupervisorDetail {
    pub fn supervises(&self, floor: i64) -> bool {
        self.floors.contains(&floor)
    }
}

/// Register (or re-register) a supervisor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorCreate {
    pub identity: String,
    pub name: String,
    pub floors: Vec<i64>,
}

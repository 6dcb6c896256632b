//! Unified error codes for the dormitory duty service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Registry errors (floors, rooms, supervisors)
//! - 4xxx: Duty errors (schedule, queue, confirmation)
//! - 5xxx: Attendance errors
//! - 6xxx: Penalty errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize the same
/// way for every client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Requester identity is missing
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Requester is not the supervisor of the targeted floor
    NotFloorSupervisor = 2002,

    // ==================== 3xxx: Registry ====================
    FloorNotFound = 3001,
    RoomNotFound = 3002,
    SupervisorNotFound = 3003,
    /// Floor has no rooms, so no rotation can be computed
    RoomRegistryEmpty = 3005,

    // ==================== 4xxx: Duty ====================
    DutyRecordNotFound = 4001,

    // ==================== 5xxx: Attendance ====================
    AttendanceSessionNotFound = 5001,
    AttendanceSessionState = 5002,

    // ==================== 6xxx: Penalty ====================
    PenaltyInvalidDuration = 6001,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Requester identity is required",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::NotFloorSupervisor => "Requester is not the supervisor of this floor",

            // Registry
            ErrorCode::FloorNotFound => "Floor not found",
            ErrorCode::RoomNotFound => "Room not found",
            ErrorCode::SupervisorNotFound => "Supervisor not found",
            ErrorCode::RoomRegistryEmpty => "Floor has no rooms",

            // Duty
            ErrorCode::DutyRecordNotFound => "Duty record not found",

            // Attendance
            ErrorCode::AttendanceSessionNotFound => "No attendance session in progress",
            ErrorCode::AttendanceSessionState => "Attendance session is in a different step",

            // Penalty
            ErrorCode::PenaltyInvalidDuration => "Penalty duration must be at least one day",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::NotFloorSupervisor),

            // Registry
            3001 => Ok(ErrorCode::FloorNotFound),
            3002 => Ok(ErrorCode::RoomNotFound),
            3003 => Ok(ErrorCode::SupervisorNotFound),
            3005 => Ok(ErrorCode::RoomRegistryEmpty),

            // Duty
            4001 => Ok(ErrorCode::DutyRecordNotFound),

            // Attendance
            5001 => Ok(ErrorCode::AttendanceSessionNotFound),
            5002 => Ok(ErrorCode::AttendanceSessionState),

            // Penalty
            6001 => Ok(ErrorCode::PenaltyInvalidDuration),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::NotFloorSupervisor.code(), 2002);
        assert_eq!(ErrorCode::RoomRegistryEmpty.code(), 3005);
        assert_eq!(ErrorCode::DutyRecordNotFound.code(), 4001);
        assert_eq!(ErrorCode::AttendanceSessionNotFound.code(), 5001);
        assert_eq!(ErrorCode::PenaltyInvalidDuration.code(), 6001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_try_from_known_codes() {
        for code in [
            ErrorCode::Success,
            ErrorCode::NotFloorSupervisor,
            ErrorCode::RoomRegistryEmpty,
            ErrorCode::AttendanceSessionState,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_unknown_code() {
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::FloorNotFound).unwrap();
        assert_eq!(json, "3001");
        let code: ErrorCode = serde_json::from_str("2001").unwrap();
        assert_eq!(code, ErrorCode::PermissionDenied);
        assert!(serde_json::from_str::<ErrorCode>("7777").is_err());
    }
}

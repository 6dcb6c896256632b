//! Duty rotation (值日轮换)
//!
//! - [`rotation`] - pure sequence arithmetic (no I/O)
//! - [`scheduler`] - schedule generation, confirmation and skip/deferral
//! - [`report`] - daily completion report

pub mod report;
pub mod rotation;
pub mod scheduler;

pub use rotation::DutySequence;
pub use scheduler::{DutyScheduler, ScheduleRun, SkipRequest};

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::repository::RepoError;

/// Duty domain errors
#[derive(Debug, Error)]
pub enum DutyError {
    #[error("Storage error: {0}")]
    Repo(#[from] RepoError),

    #[error("{message}")]
    NotFound { code: ErrorCode, message: String },

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Floor {floor} has no rooms")]
    EmptySequence { floor: i64 },
}

impl DutyError {
    pub fn floor_not_found(floor: i64) -> Self {
        Self::NotFound {
            code: ErrorCode::FloorNotFound,
            message: format!("Floor {floor} not found"),
        }
    }

    pub fn record_not_found(date: &str, floor: i64) -> Self {
        Self::NotFound {
            code: ErrorCode::DutyRecordNotFound,
            message: format!("No duty record for floor {floor} on {date}"),
        }
    }
}

impl From<sqlx::Error> for DutyError {
    fn from(err: sqlx::Error) -> Self {
        DutyError::Repo(err.into())
    }
}

impl From<DutyError> for AppError {
    fn from(err: DutyError) -> Self {
        match err {
            DutyError::Repo(e) => {
                tracing::error!(error = %e, "Duty storage error");
                e.into()
            }
            DutyError::NotFound { code, message } => AppError::with_message(code, message),
            DutyError::Unauthorized(msg) => {
                AppError::with_message(ErrorCode::NotFloorSupervisor, msg)
            }
            DutyError::Validation(msg) => AppError::validation(msg),
            DutyError::EmptySequence { floor } => AppError::with_message(
                ErrorCode::RoomRegistryEmpty,
                format!("Floor {floor} has no rooms"),
            )
            .with_detail("floor", floor),
        }
    }
}

pub type DutyResult<T> = Result<T, DutyError>;

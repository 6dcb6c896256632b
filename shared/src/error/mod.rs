//! Unified error system for the dormitory duty service
//!
//! - [`ErrorCode`]: numeric codes, grouped by range
//! - [`ErrorCategory`]: range classification
//! - [`AppError`]: code + message + optional details, renders as [`ApiResponse`]
//!
//! | Range | Category |
//! |-------|----------|
//! | 0xxx | General |
//! | 1xxx | Auth |
//! | 2xxx | Permission |
//! | 3xxx | Registry |
//! | 4xxx | Duty |
//! | 5xxx | Attendance |
//! | 6xxx | Penalty |
//! | 9xxx | System |
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::with_message(ErrorCode::NotFloorSupervisor, "Not the supervisor of floor 3")
//!     .with_detail("floor", 3);
//!
//! let response = ApiResponse::error(&err);
//! assert_eq!(response.code, 2002);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};

//! HRMS common core types.

pub mod id;
pub mod timestamp;

pub use id::{CompanyId, IdParseError, UserId, SYSTEM_USER_ID};
pub use timestamp::Timestamp;

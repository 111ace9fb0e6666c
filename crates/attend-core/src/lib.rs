pub mod domain;
pub mod error;
pub mod ids;
pub mod time;

pub use domain::{AttendanceRecord, AttendanceStatus, Employee, Office};
pub use error::{AttendError, AttendResult, ErrorCode};
pub use ids::{AttendanceId, EmployeeId, OfficeId, TenantId, UserId};
pub use time::{day_start, now_epoch_millis, EpochMillis, MILLIS_PER_DAY};

use crate::location::LocationError;
use attend_core::{AttendError, AttendanceId, ErrorCode};
use attend_geo::CoordinateError;
use attend_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CheckInError {
    #[error("employee not found")]
    EmployeeNotFound,
    #[error("employee is inactive")]
    EmployeeInactive,
    #[error("employee has no office assigned")]
    NoOfficeAssigned,
    #[error("office not found")]
    OfficeNotFound,
    #[error("office location is not configured")]
    ReferenceMissing,
    #[error("already checked in (record {0})")]
    AlreadyCheckedIn(AttendanceId),
    #[error("no open check-in to close")]
    NotCheckedIn,
    #[error("{distance_m:.1} m from the office, allowed radius is {threshold_m:.1} m")]
    OutOfRange { distance_m: f64, threshold_m: f64 },
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordinateError),
    #[error("{0}")]
    Location(#[from] LocationError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CheckInError {
    /// Metric label for this failure.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::EmployeeNotFound | Self::OfficeNotFound => "not_found",
            Self::EmployeeInactive => "inactive",
            Self::NoOfficeAssigned => "no_office",
            Self::ReferenceMissing => "reference_missing",
            Self::AlreadyCheckedIn(_) => "already_checked_in",
            Self::NotCheckedIn => "not_checked_in",
            Self::OutOfRange { .. } => "out_of_range",
            Self::InvalidCoordinate(_) => "invalid_coordinate",
            Self::Location(_) => "location_error",
            Self::Storage(_) => "storage_error",
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmployeeNotFound | Self::OfficeNotFound => ErrorCode::NotFound,
            Self::EmployeeInactive | Self::ReferenceMissing | Self::OutOfRange { .. } => {
                ErrorCode::Forbidden
            }
            Self::NoOfficeAssigned | Self::InvalidCoordinate(_) => ErrorCode::InvalidInput,
            Self::AlreadyCheckedIn(_) | Self::NotCheckedIn => ErrorCode::Conflict,
            Self::Location(LocationError::Timeout) => ErrorCode::Timeout,
            Self::Location(_) => ErrorCode::Unavailable,
            Self::Storage(_) => ErrorCode::Internal,
        }
    }
}

impl From<CheckInError> for AttendError {
    fn from(err: CheckInError) -> Self {
        AttendError::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_categories() {
        assert_eq!(CheckInError::EmployeeNotFound.code(), ErrorCode::NotFound);
        assert_eq!(
            CheckInError::Location(LocationError::Timeout).code(),
            ErrorCode::Timeout
        );
        assert_eq!(
            CheckInError::Location(LocationError::PermissionDenied).code(),
            ErrorCode::Unavailable
        );
        assert_eq!(CheckInError::NotCheckedIn.code(), ErrorCode::Conflict);
    }

    #[test]
    fn wrapped_errors_keep_their_source() {
        use std::error::Error as _;

        let err = CheckInError::from(StorageError::new("pool closed"));
        assert_eq!(err.to_string(), "storage error: pool closed");
        assert!(err.source().is_some());

        let err: CheckInError = LocationError::Timeout.into();
        assert_eq!(err.to_string(), "timed out waiting for a position");
        assert_eq!(err.outcome(), "location_error");

        let err: CheckInError = CoordinateError::LatitudeOutOfRange(200.0).into();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
        assert_eq!(err.to_string(), "invalid coordinate: latitude 200 outside [-90, 90]");
    }

    #[test]
    fn out_of_range_message() {
        let err: AttendError = CheckInError::OutOfRange {
            distance_m: 500.44,
            threshold_m: 100.0,
        }
        .into();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert_eq!(
            err.message,
            "500.4 m from the office, allowed radius is 100.0 m"
        );
    }
}

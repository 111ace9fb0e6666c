mod error;
mod location;
mod report;
mod service;

pub use error::CheckInError;
pub use location::{FixedLocation, LocationError, LocationProvider};
pub use report::{export_csv, summarize, DailySummary, CSV_HEADER};
pub use service::{evaluate, CheckInOutcome, CheckInService, GeofenceDecision};

use crate::error::{AttendError, AttendResult};
use crate::ids::{AttendanceId, EmployeeId, OfficeId, TenantId};
use crate::time::EpochMillis;
use attend_geo::{Coordinate, GeoFence, ProximityThreshold};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    CheckedIn,
    CheckedOut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Office {
    pub id: OfficeId,
    pub tenant_id: TenantId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub location: Option<Coordinate>,
    #[serde(default)]
    pub radius_m: Option<f64>,
    pub created_at_ms: EpochMillis,
    pub updated_at_ms: EpochMillis,
}

impl Office {
    pub fn validate(&self) -> AttendResult<()> {
        if self.name.trim().is_empty() {
            return Err(AttendError::invalid_input("office name is required"));
        }
        if let Some(location) = self.location {
            location
                .validate()
                .map_err(|err| AttendError::invalid_input(format!("office location: {err}")))?;
        }
        if let Some(radius) = self.radius_m {
            ProximityThreshold::new(radius)
                .map_err(|err| AttendError::invalid_input(format!("office radius: {err}")))?;
        }
        Ok(())
    }

    /// Geofence around the office; `None` when no location is configured.
    /// Falls back to `default_radius` when the office has no radius of its own.
    pub fn geofence(&self, default_radius: ProximityThreshold) -> Option<GeoFence> {
        let center = self.location?;
        let radius = self
            .radius_m
            .and_then(|value| ProximityThreshold::new(value).ok())
            .unwrap_or(default_radius);
        Some(GeoFence::circle(center, radius))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub tenant_id: TenantId,
    #[serde(default)]
    pub office_id: Option<OfficeId>,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at_ms: EpochMillis,
    pub updated_at_ms: EpochMillis,
}

fn default_active() -> bool {
    true
}

impl Employee {
    pub fn validate(&self) -> AttendResult<()> {
        if self.full_name.trim().is_empty() {
            return Err(AttendError::invalid_input("employee full_name is required"));
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
            _ => Err(AttendError::invalid_input("employee email is invalid")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub office_id: OfficeId,
    pub status: AttendanceStatus,
    pub check_in_at_ms: EpochMillis,
    pub check_in_location: Coordinate,
    #[serde(default)]
    pub check_in_distance_m: Option<f64>,
    #[serde(default)]
    pub check_out_at_ms: Option<EpochMillis>,
    #[serde(default)]
    pub check_out_location: Option<Coordinate>,
    #[serde(default)]
    pub check_out_distance_m: Option<f64>,
}

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.status == AttendanceStatus::CheckedIn
    }

    pub fn duration_ms(&self) -> Option<EpochMillis> {
        self.check_out_at_ms
            .map(|out| out.saturating_sub(self.check_in_at_ms))
    }

    pub fn close(&mut self, at_ms: EpochMillis, location: Coordinate, distance_m: Option<f64>) {
        self.status = AttendanceStatus::CheckedOut;
        self.check_out_at_ms = Some(at_ms);
        self.check_out_location = Some(location);
        self.check_out_distance_m = distance_m;
    }
}

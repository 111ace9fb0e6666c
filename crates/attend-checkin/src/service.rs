use crate::error::CheckInError;
use crate::location::{LocationError, LocationProvider};
use attend_config::{GeofenceConfig, MissingReferencePolicy};
use attend_core::{
    now_epoch_millis, AttendanceId, AttendanceRecord, AttendanceStatus, Employee, EmployeeId,
    Office, OfficeId, TenantId,
};
use attend_geo::{is_within_range, Coordinate};
use attend_observability::{record_checkin, record_checkout};
use attend_storage::{AttendanceRepository, EmployeeRepository, OfficeRepository, OpenInsert};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeofenceDecision {
    pub distance_m: Option<f64>,
    pub threshold_m: f64,
    pub within_range: bool,
    pub reference_missing: bool,
}

/// Geofence verdict for `point` against the office.
///
/// The radius is the office's own when set, otherwise the configured default.
/// An office without a location yields `reference_missing` and the configured
/// missing-reference policy decides the verdict.
pub fn evaluate(
    office: Option<&Office>,
    point: Coordinate,
    config: &GeofenceConfig,
) -> GeofenceDecision {
    let Some(fence) = office.and_then(|office| office.geofence(config.default_radius)) else {
        return GeofenceDecision {
            distance_m: None,
            threshold_m: config.default_radius.meters(),
            within_range: config.missing_reference == MissingReferencePolicy::Allow,
            reference_missing: true,
        };
    };

    let threshold_m = fence.radius_m();
    GeofenceDecision {
        distance_m: Some(fence.distance_to(point)),
        threshold_m,
        within_range: is_within_range(point, fence.center(), threshold_m),
        reference_missing: false,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckInOutcome {
    pub record: AttendanceRecord,
    pub decision: GeofenceDecision,
}

#[derive(Clone)]
pub struct CheckInService {
    offices: Arc<dyn OfficeRepository>,
    employees: Arc<dyn EmployeeRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    config: GeofenceConfig,
}

impl CheckInService {
    pub fn new(
        offices: Arc<dyn OfficeRepository>,
        employees: Arc<dyn EmployeeRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        config: GeofenceConfig,
    ) -> Self {
        Self {
            offices,
            employees,
            attendance,
            config,
        }
    }

    pub fn config(&self) -> &GeofenceConfig {
        &self.config
    }

    pub async fn check_in(
        &self,
        tenant_id: TenantId,
        employee_id: EmployeeId,
        provider: &dyn LocationProvider,
    ) -> Result<CheckInOutcome, CheckInError> {
        let result = self.try_check_in(tenant_id, employee_id, provider).await;
        match &result {
            Ok(outcome) => {
                record_checkin("accepted");
                tracing::info!(
                    employee_id = %employee_id,
                    office_id = %outcome.record.office_id,
                    distance_m = ?outcome.decision.distance_m,
                    threshold_m = outcome.decision.threshold_m,
                    reference_missing = outcome.decision.reference_missing,
                    "check-in accepted"
                );
            }
            Err(err) => {
                record_checkin(err.outcome());
                tracing::warn!(employee_id = %employee_id, error = %err, "check-in rejected");
            }
        }
        result
    }

    pub async fn check_out(
        &self,
        tenant_id: TenantId,
        employee_id: EmployeeId,
        provider: &dyn LocationProvider,
    ) -> Result<CheckInOutcome, CheckInError> {
        let result = self.try_check_out(tenant_id, employee_id, provider).await;
        match &result {
            Ok(outcome) => {
                record_checkout("accepted");
                tracing::info!(
                    employee_id = %employee_id,
                    record_id = %outcome.record.id,
                    distance_m = ?outcome.decision.distance_m,
                    "check-out accepted"
                );
            }
            Err(err) => {
                record_checkout(err.outcome());
                tracing::warn!(employee_id = %employee_id, error = %err, "check-out rejected");
            }
        }
        result
    }

    async fn try_check_in(
        &self,
        tenant_id: TenantId,
        employee_id: EmployeeId,
        provider: &dyn LocationProvider,
    ) -> Result<CheckInOutcome, CheckInError> {
        let employee = self.load_employee(tenant_id, employee_id).await?;
        if !employee.active {
            return Err(CheckInError::EmployeeInactive);
        }
        let office_id = employee.office_id.ok_or(CheckInError::NoOfficeAssigned)?;
        let office = self
            .load_office(tenant_id, office_id)
            .await?
            .ok_or(CheckInError::OfficeNotFound)?;

        if let Some(open) = self.attendance.open_for_employee(employee_id).await? {
            return Err(CheckInError::AlreadyCheckedIn(open.id));
        }

        let point = self.acquire(provider).await?;
        let decision = self.admit(Some(&office), point)?;

        let record = AttendanceRecord {
            id: AttendanceId::new(),
            tenant_id,
            employee_id,
            office_id,
            status: AttendanceStatus::CheckedIn,
            check_in_at_ms: now_epoch_millis(),
            check_in_location: point,
            check_in_distance_m: decision.distance_m,
            check_out_at_ms: None,
            check_out_location: None,
            check_out_distance_m: None,
        };
        // A concurrent check-in may have won since the open-record check above.
        if let OpenInsert::AlreadyOpen(open_id) = self.attendance.insert_open(record.clone()).await?
        {
            return Err(CheckInError::AlreadyCheckedIn(open_id));
        }

        Ok(CheckInOutcome { record, decision })
    }

    async fn try_check_out(
        &self,
        tenant_id: TenantId,
        employee_id: EmployeeId,
        provider: &dyn LocationProvider,
    ) -> Result<CheckInOutcome, CheckInError> {
        self.load_employee(tenant_id, employee_id).await?;
        let mut record = self
            .attendance
            .open_for_employee(employee_id)
            .await?
            .ok_or(CheckInError::NotCheckedIn)?;

        // The office may have been removed since check-in; that counts as a
        // missing reference rather than an error.
        let office = self.load_office(tenant_id, record.office_id).await?;

        let point = self.acquire(provider).await?;
        let decision = self.admit(office.as_ref(), point)?;

        record.close(now_epoch_millis(), point, decision.distance_m);
        self.attendance.upsert(record.clone()).await?;

        Ok(CheckInOutcome { record, decision })
    }

    async fn load_employee(
        &self,
        tenant_id: TenantId,
        employee_id: EmployeeId,
    ) -> Result<Employee, CheckInError> {
        match self.employees.get(employee_id).await? {
            Some(employee) if employee.tenant_id == tenant_id => Ok(employee),
            _ => Err(CheckInError::EmployeeNotFound),
        }
    }

    async fn load_office(
        &self,
        tenant_id: TenantId,
        office_id: OfficeId,
    ) -> Result<Option<Office>, CheckInError> {
        Ok(self
            .offices
            .get(office_id)
            .await?
            .filter(|office| office.tenant_id == tenant_id))
    }

    async fn acquire(&self, provider: &dyn LocationProvider) -> Result<Coordinate, CheckInError> {
        let timeout = Duration::from_millis(self.config.location_timeout_ms);
        let point = tokio::time::timeout(timeout, provider.current_position())
            .await
            .map_err(|_| LocationError::Timeout)??;
        Ok(self.config.coordinate_policy.apply(point)?)
    }

    fn admit(
        &self,
        office: Option<&Office>,
        point: Coordinate,
    ) -> Result<GeofenceDecision, CheckInError> {
        let decision = evaluate(office, point, &self.config);
        if decision.within_range {
            return Ok(decision);
        }
        match decision.distance_m {
            Some(distance_m) => Err(CheckInError::OutOfRange {
                distance_m,
                threshold_m: decision.threshold_m,
            }),
            None => Err(CheckInError::ReferenceMissing),
        }
    }
}

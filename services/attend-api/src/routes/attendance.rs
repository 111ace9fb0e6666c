use actix_web::{get, post, web, HttpRequest, HttpResponse};
use attend_checkin::{export_csv, summarize, FixedLocation};
use attend_core::{AttendError, EmployeeId, EpochMillis, OfficeId};
use attend_geo::Coordinate;
use attend_identity::{Permission, Session};
use attend_storage::AttendanceFilter;
use serde::Deserialize;
use std::collections::HashSet;

use crate::auth::authorize_request;
use crate::routes::common::{
    bad_request, error_response, forbidden, internal_error, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use crate::state::AppState;

/// A position the client resolved before calling. `employee_id` defaults to
/// the employee bound to the session.
#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub employee_id: Option<EmployeeId>,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    pub employee_id: Option<EmployeeId>,
    pub office_id: Option<OfficeId>,
    pub from_ms: Option<EpochMillis>,
    pub to_ms: Option<EpochMillis>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl AttendanceQuery {
    /// Page size capped at `MAX_PAGE_SIZE`, whatever the caller asks for.
    fn limit(&self, default: usize) -> usize {
        self.limit.unwrap_or(default).min(MAX_PAGE_SIZE)
    }

    fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    fn filter(&self) -> AttendanceFilter {
        AttendanceFilter {
            employee_id: self.employee_id,
            office_id: self.office_id,
            from_ms: self.from_ms,
            to_ms: self.to_ms,
        }
    }
}

enum Direction {
    In,
    Out,
}

#[post("/v1/attendance/check-in")]
pub async fn check_in(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<CheckInRequest>,
) -> HttpResponse {
    record(req, state, payload.into_inner(), Direction::In).await
}

#[post("/v1/attendance/check-out")]
pub async fn check_out(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<CheckInRequest>,
) -> HttpResponse {
    record(req, state, payload.into_inner(), Direction::Out).await
}

async fn record(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: CheckInRequest,
    direction: Direction,
) -> HttpResponse {
    let session = match authorize_request(&req, &state, Permission::RecordAttendance) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let employee_id = match acting_employee(&session, request.employee_id) {
        Ok(employee_id) => employee_id,
        Err(response) => return response,
    };

    let mut point = Coordinate::new(request.latitude, request.longitude);
    if let Some(accuracy_m) = request.accuracy_m {
        point = point.with_accuracy(accuracy_m);
    }
    let provider = FixedLocation(point);
    let tenant_id = session.subject.tenant_id;

    let result = match direction {
        Direction::In => state.checkin.check_in(tenant_id, employee_id, &provider).await,
        Direction::Out => state.checkin.check_out(tenant_id, employee_id, &provider).await,
    };
    match result {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(err) => error_response(&AttendError::from(err)),
    }
}

fn acting_employee(
    session: &Session,
    requested: Option<EmployeeId>,
) -> Result<EmployeeId, HttpResponse> {
    let Some(employee_id) = requested.or(session.subject.employee_id) else {
        return Err(bad_request("employee_id is required"));
    };
    if !session.subject.can_act_for(employee_id) {
        return Err(forbidden("cannot record attendance for another employee"));
    }
    Ok(employee_id)
}

#[get("/v1/attendance")]
pub async fn list_attendance(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<AttendanceQuery>,
) -> HttpResponse {
    let session = match authorize_request(&req, &state, Permission::ViewAttendance) {
        Ok(session) => session,
        Err(response) => return response,
    };
    match state
        .attendance
        .list_by_tenant(
            session.subject.tenant_id,
            &query.filter(),
            query.limit(DEFAULT_PAGE_SIZE),
            query.offset(),
        )
        .await
    {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(err) => internal_error(err.message),
    }
}

#[get("/v1/attendance/export")]
pub async fn export_attendance(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<AttendanceQuery>,
) -> HttpResponse {
    let session = match authorize_request(&req, &state, Permission::ExportAttendance) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let tenant_id = session.subject.tenant_id;

    let records = match state
        .attendance
        .list_by_tenant(
            tenant_id,
            &query.filter(),
            query.limit(MAX_PAGE_SIZE),
            query.offset(),
        )
        .await
    {
        Ok(records) => records,
        Err(err) => return internal_error(err.message),
    };

    let employee_ids: HashSet<EmployeeId> =
        records.iter().map(|record| record.employee_id).collect();
    let mut employees = Vec::with_capacity(employee_ids.len());
    for employee_id in employee_ids {
        match state.employees.get(employee_id).await {
            Ok(Some(employee)) if employee.tenant_id == tenant_id => employees.push(employee),
            Ok(_) => {}
            Err(err) => return internal_error(err.message),
        }
    }

    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "content-disposition",
            "attachment; filename=\"attendance.csv\"",
        ))
        .body(export_csv(&records, &employees))
}

#[get("/v1/attendance/summary")]
pub async fn attendance_summary(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<AttendanceQuery>,
) -> HttpResponse {
    let session = match authorize_request(&req, &state, Permission::ViewAttendance) {
        Ok(session) => session,
        Err(response) => return response,
    };

    match state
        .attendance
        .list_by_tenant(
            session.subject.tenant_id,
            &query.filter(),
            query.limit(MAX_PAGE_SIZE),
            query.offset(),
        )
        .await
    {
        Ok(records) => HttpResponse::Ok().json(summarize(&records)),
        Err(err) => internal_error(err.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<usize>, offset: Option<usize>) -> AttendanceQuery {
        AttendanceQuery {
            employee_id: None,
            office_id: None,
            from_ms: None,
            to_ms: None,
            limit,
            offset,
        }
    }

    #[test]
    fn page_size_is_capped() {
        assert_eq!(query(None, None).limit(DEFAULT_PAGE_SIZE), DEFAULT_PAGE_SIZE);
        assert_eq!(query(None, None).limit(MAX_PAGE_SIZE), MAX_PAGE_SIZE);
        assert_eq!(query(Some(usize::MAX), None).limit(MAX_PAGE_SIZE), MAX_PAGE_SIZE);
        assert_eq!(query(Some(7), Some(3)).limit(MAX_PAGE_SIZE), 7);
        assert_eq!(query(Some(7), Some(3)).offset(), 3);
    }
}

use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use attend_core::{now_epoch_millis, Employee, EmployeeId, OfficeId};
use attend_identity::Permission;
use serde::Deserialize;

use crate::auth::authorize_request;
use crate::routes::common::{
    bad_request, error_response, internal_error, not_found, parse_id, PageQuery,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmployeeInput {
    pub id: Option<EmployeeId>,
    pub office_id: Option<OfficeId>,
    pub full_name: String,
    pub email: String,
    pub position: Option<String>,
    pub active: Option<bool>,
}

#[get("/v1/employees")]
pub async fn list_employees(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    let session = match authorize_request(&req, &state, Permission::ViewEmployees) {
        Ok(session) => session,
        Err(response) => return response,
    };

    match state
        .employees
        .list_by_tenant(session.subject.tenant_id, query.limit(), query.offset())
        .await
    {
        Ok(employees) => HttpResponse::Ok().json(employees),
        Err(err) => internal_error(err.message),
    }
}

#[get("/v1/employees/{id}")]
pub async fn get_employee(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> HttpResponse {
    let session = match authorize_request(&req, &state, Permission::ViewEmployees) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let employee_id: EmployeeId = match parse_id(&id) {
        Ok(value) => value,
        Err(response) => return response,
    };

    match state.employees.get(employee_id).await {
        Ok(Some(employee)) if employee.tenant_id == session.subject.tenant_id => {
            HttpResponse::Ok().json(employee)
        }
        Ok(_) => not_found("employee not found"),
        Err(err) => internal_error(err.message),
    }
}

#[post("/v1/employees")]
pub async fn upsert_employee(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<EmployeeInput>,
) -> HttpResponse {
    let session = match authorize_request(&req, &state, Permission::EditEmployees) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let input = payload.into_inner();
    let tenant_id = session.subject.tenant_id;
    let now = now_epoch_millis();

    if let Some(office_id) = input.office_id {
        match state.offices.get(office_id).await {
            Ok(Some(office)) if office.tenant_id == tenant_id => {}
            Ok(_) => return bad_request("office_id does not reference a known office"),
            Err(err) => return internal_error(err.message),
        }
    }

    let existing = match input.id {
        Some(id) => match state.employees.get(id).await {
            Ok(Some(employee)) if employee.tenant_id == tenant_id => Some(employee),
            Ok(_) => return not_found("employee not found"),
            Err(err) => return internal_error(err.message),
        },
        None => None,
    };

    let employee = Employee {
        id: input.id.unwrap_or_default(),
        tenant_id,
        office_id: input.office_id,
        full_name: input.full_name.trim().to_string(),
        email: input.email.trim().to_ascii_lowercase(),
        position: input.position,
        active: input
            .active
            .or(existing.as_ref().map(|employee| employee.active))
            .unwrap_or(true),
        created_at_ms: existing
            .map(|employee| employee.created_at_ms)
            .unwrap_or(now),
        updated_at_ms: now,
    };
    if let Err(err) = employee.validate() {
        return error_response(&err);
    }

    match state.employees.upsert(employee.clone()).await {
        Ok(()) => HttpResponse::Ok().json(employee),
        Err(err) => internal_error(err.message),
    }
}

#[delete("/v1/employees/{id}")]
pub async fn delete_employee(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> HttpResponse {
    let session = match authorize_request(&req, &state, Permission::EditEmployees) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let employee_id: EmployeeId = match parse_id(&id) {
        Ok(value) => value,
        Err(response) => return response,
    };

    match state.employees.get(employee_id).await {
        Ok(Some(employee)) if employee.tenant_id == session.subject.tenant_id => {}
        Ok(_) => return not_found("employee not found"),
        Err(err) => return internal_error(err.message),
    }

    match state.employees.delete(employee_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => internal_error(err.message),
    }
}

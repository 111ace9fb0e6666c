use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use attend_core::{now_epoch_millis, Office, OfficeId};
use attend_geo::{nearest, Coordinate};
use attend_identity::Permission;
use serde::{Deserialize, Serialize};

use crate::auth::authorize_request;
use crate::routes::common::{
    bad_request, error_response, internal_error, not_found, parse_id, PageQuery, MAX_PAGE_SIZE,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OfficeInput {
    pub id: Option<OfficeId>,
    pub name: String,
    pub address: Option<String>,
    pub location: Option<Coordinate>,
    pub radius_m: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
struct NearestResponse {
    office: Office,
    distance_m: f64,
    within_range: bool,
}

#[get("/v1/offices")]
pub async fn list_offices(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    let session = match authorize_request(&req, &state, Permission::ViewOffices) {
        Ok(session) => session,
        Err(response) => return response,
    };

    match state
        .offices
        .list_by_tenant(session.subject.tenant_id, query.limit(), query.offset())
        .await
    {
        Ok(offices) => HttpResponse::Ok().json(offices),
        Err(err) => internal_error(err.message),
    }
}

#[get("/v1/offices/nearest")]
pub async fn nearest_office(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<NearestQuery>,
) -> HttpResponse {
    let session = match authorize_request(&req, &state, Permission::ViewOffices) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let point = match state
        .checkin
        .config()
        .coordinate_policy
        .apply(Coordinate::new(query.latitude, query.longitude))
    {
        Ok(point) => point,
        Err(err) => return bad_request(err.to_string()),
    };

    let offices = match state
        .offices
        .list_by_tenant(session.subject.tenant_id, MAX_PAGE_SIZE, 0)
        .await
    {
        Ok(offices) => offices,
        Err(err) => return internal_error(err.message),
    };

    let default_radius = state.checkin.config().default_radius;
    match nearest(point, &offices, |office| office.location) {
        Some((office, distance_m)) => {
            let within_range = office
                .geofence(default_radius)
                .is_some_and(|fence| distance_m <= fence.radius_m());
            HttpResponse::Ok().json(NearestResponse {
                office: office.clone(),
                distance_m,
                within_range,
            })
        }
        None => not_found("no office with a configured location"),
    }
}

#[get("/v1/offices/{id}")]
pub async fn get_office(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> HttpResponse {
    let session = match authorize_request(&req, &state, Permission::ViewOffices) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let office_id: OfficeId = match parse_id(&id) {
        Ok(value) => value,
        Err(response) => return response,
    };

    match state.offices.get(office_id).await {
        Ok(Some(office)) if office.tenant_id == session.subject.tenant_id => {
            HttpResponse::Ok().json(office)
        }
        Ok(_) => not_found("office not found"),
        Err(err) => internal_error(err.message),
    }
}

#[post("/v1/offices")]
pub async fn upsert_office(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<OfficeInput>,
) -> HttpResponse {
    let session = match authorize_request(&req, &state, Permission::EditOffices) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let input = payload.into_inner();
    let tenant_id = session.subject.tenant_id;
    let now = now_epoch_millis();

    let existing = match input.id {
        Some(id) => match state.offices.get(id).await {
            Ok(Some(office)) if office.tenant_id == tenant_id => Some(office),
            Ok(_) => return not_found("office not found"),
            Err(err) => return internal_error(err.message),
        },
        None => None,
    };

    let office = Office {
        id: input.id.unwrap_or_default(),
        tenant_id,
        name: input.name.trim().to_string(),
        address: input.address,
        location: input.location,
        radius_m: input.radius_m,
        created_at_ms: existing.map(|office| office.created_at_ms).unwrap_or(now),
        updated_at_ms: now,
    };
    if let Err(err) = office.validate() {
        return error_response(&err);
    }

    match state.offices.upsert(office.clone()).await {
        Ok(()) => HttpResponse::Ok().json(office),
        Err(err) => internal_error(err.message),
    }
}

#[delete("/v1/offices/{id}")]
pub async fn delete_office(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> HttpResponse {
    let session = match authorize_request(&req, &state, Permission::EditOffices) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let office_id: OfficeId = match parse_id(&id) {
        Ok(value) => value,
        Err(response) => return response,
    };

    match state.offices.get(office_id).await {
        Ok(Some(office)) if office.tenant_id == session.subject.tenant_id => {}
        Ok(_) => return not_found("office not found"),
        Err(err) => return internal_error(err.message),
    }

    match state.offices.delete(office_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => internal_error(err.message),
    }
}

use actix_web::{post, web, HttpRequest, HttpResponse};
use attend_geo::{distance_meters, is_within_range, Coordinate, ProximityThreshold};
use attend_identity::Permission;
use serde::{Deserialize, Serialize};

use crate::auth::authorize_request;
use crate::routes::common::bad_request;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub point: Coordinate,
    pub reference: Coordinate,
    pub threshold_m: Option<f64>,
}

#[derive(Debug, Serialize)]
struct EvaluateResponse {
    distance_m: f64,
    threshold_m: f64,
    within_range: bool,
}

#[post("/v1/geofence/evaluate")]
pub async fn evaluate(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<EvaluateRequest>,
) -> HttpResponse {
    if let Err(response) = authorize_request(&req, &state, Permission::ViewOffices) {
        return response;
    }
    let request = payload.into_inner();
    let config = state.checkin.config();

    let threshold = match request.threshold_m {
        Some(value) => match ProximityThreshold::new(value) {
            Ok(threshold) => threshold,
            Err(err) => return bad_request(err.to_string()),
        },
        None => config.default_radius,
    };
    let (point, reference) = match (
        config.coordinate_policy.apply(request.point),
        config.coordinate_policy.apply(request.reference),
    ) {
        (Ok(point), Ok(reference)) => (point, reference),
        (Err(err), _) | (_, Err(err)) => return bad_request(err.to_string()),
    };

    HttpResponse::Ok().json(EvaluateResponse {
        distance_m: distance_meters(point, reference),
        threshold_m: threshold.meters(),
        within_range: is_within_range(point, reference, threshold.meters()),
    })
}

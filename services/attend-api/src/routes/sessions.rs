use actix_web::{delete, post, web, HttpRequest, HttpResponse};
use attend_core::EpochMillis;
use attend_identity::{Session, SessionToken, Subject};
use serde::Serialize;

use crate::auth::{bearer_token, verify_issuer};
use crate::routes::common::{bad_request, unauthorized};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct SessionResponse {
    token: SessionToken,
    subject: Subject,
    expires_at_ms: EpochMillis,
}

#[post("/v1/sessions")]
pub async fn create_session(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<Subject>,
) -> HttpResponse {
    if let Err(response) = verify_issuer(&req, &state) {
        return response;
    }
    let subject = payload.into_inner();
    if subject.roles.is_empty() {
        return bad_request("subject needs at least one role");
    }

    let ttl_ms = state.session_config.ttl_secs.saturating_mul(1_000);
    let session = Session::issue(subject, ttl_ms);
    let response = SessionResponse {
        token: session.token.clone(),
        subject: session.subject.clone(),
        expires_at_ms: session.expires_at_ms,
    };
    tracing::info!(
        tenant_id = %session.subject.tenant_id,
        user_id = %session.subject.user_id,
        "session issued"
    );
    state.sessions.set(session);

    HttpResponse::Created().json(response)
}

#[delete("/v1/sessions")]
pub async fn clear_session(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let Some(token) = bearer_token(&req) else {
        return unauthorized("missing bearer token");
    };
    state.sessions.clear(&token);
    HttpResponse::NoContent().finish()
}

use actix_web::{HttpRequest, HttpResponse};
use attend_identity::{Permission, Session, SessionToken};

use crate::routes::common::{forbidden, unauthorized};
use crate::state::AppState;

pub const ISSUER_HEADER: &str = "x-attend-issuer-token";

/// Resolves the bearer token to a live session and checks the permission.
pub fn authorize_request(
    req: &HttpRequest,
    state: &AppState,
    permission: Permission,
) -> Result<Session, HttpResponse> {
    let session = current_session(req, state)?;
    if !session.allows(permission) {
        tracing::debug!(
            user_id = %session.subject.user_id,
            permission = ?permission,
            "permission denied"
        );
        return Err(forbidden("permission denied"));
    }
    Ok(session)
}

pub fn current_session(req: &HttpRequest, state: &AppState) -> Result<Session, HttpResponse> {
    let token = bearer_token(req).ok_or_else(|| unauthorized("missing bearer token"))?;
    state
        .sessions
        .get(&token)
        .ok_or_else(|| unauthorized("session expired or unknown"))
}

pub fn bearer_token(req: &HttpRequest) -> Option<SessionToken> {
    let value = header_value(req, "authorization")?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(SessionToken::from_string(token))
}

/// Checks the shared secret an upstream identity provider presents when
/// minting sessions. Issuing is disabled when no secret is configured.
pub fn verify_issuer(req: &HttpRequest, state: &AppState) -> Result<(), HttpResponse> {
    let Some(expected) = state.session_config.issuer_token.as_deref() else {
        return Err(forbidden("session issuing is disabled"));
    };
    match header_value(req, ISSUER_HEADER) {
        Some(presented) if presented == expected => Ok(()),
        Some(_) => Err(forbidden("invalid issuer token")),
        None => Err(unauthorized("missing issuer token")),
    }
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

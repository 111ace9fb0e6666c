use actix_web::HttpResponse;
use attend_core::{AttendError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const MAX_PAGE_SIZE: usize = 1_000;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl PageQuery {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }
}

pub fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: message.into(),
    })
}

pub fn unauthorized(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse {
        error: message.into(),
    })
}

pub fn forbidden(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Forbidden().json(ErrorResponse {
        error: message.into(),
    })
}

pub fn not_found(message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: message.into(),
    })
}

pub fn internal_error(message: impl Into<String>) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: message.into(),
    })
}

pub fn error_response(err: &AttendError) -> HttpResponse {
    let mut builder = match err.code {
        ErrorCode::InvalidInput => HttpResponse::BadRequest(),
        ErrorCode::NotFound => HttpResponse::NotFound(),
        ErrorCode::Unauthorized => HttpResponse::Unauthorized(),
        ErrorCode::Forbidden => HttpResponse::Forbidden(),
        ErrorCode::Conflict => HttpResponse::Conflict(),
        ErrorCode::Timeout | ErrorCode::Unavailable => HttpResponse::ServiceUnavailable(),
        ErrorCode::Internal => HttpResponse::InternalServerError(),
    };
    builder.json(ErrorResponse {
        error: err.message.clone(),
    })
}

pub fn parse_id<T: FromStr>(value: &str) -> Result<T, HttpResponse> {
    value.parse::<T>().map_err(|_| bad_request("invalid UUID"))
}

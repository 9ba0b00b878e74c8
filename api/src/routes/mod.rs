pub mod team;

use actix_web::{
    HttpRequest, HttpResponse, Responder, ResponseError, body::BoxBody,
    dev::HttpServiceFactory, get, http::StatusCode, http::header, web,
};
use payloads::StudentId;

use crate::store::{StoreError, TeamStore};

/// Nonstandard status used by the clients for expired or unknown tokens.
const TOKEN_EXPIRED_OR_INVALID: u16 = 498;

pub fn api_services() -> impl HttpServiceFactory {
    web::scope("")
        .service(health_check)
        .service(team::join_team)
        .service(team::leave_team)
        .service(team::current_team)
}

#[get("/health_check")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("healthy")
}

#[derive(Debug, thiserror::Error)]
pub enum APIError {
    #[error("Missing authentication")]
    AuthError(#[source] anyhow::Error),
    #[error("Token expired or invalid")]
    TokenError(#[source] anyhow::Error),
    #[error("Bad request")]
    BadRequest(#[source] anyhow::Error),
    #[error("Forbidden")]
    Forbidden(#[source] anyhow::Error),
    #[error("Not found")]
    NotFound(#[source] anyhow::Error),
    #[error("Conflict")]
    Conflict(#[source] anyhow::Error),
    #[error("Gone")]
    Gone(#[source] anyhow::Error),
}

impl ResponseError for APIError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthError(_) => StatusCode::UNAUTHORIZED,
            Self::TokenError(_) => {
                StatusCode::from_u16(TOKEN_EXPIRED_OR_INVALID)
                    .unwrap_or(StatusCode::UNAUTHORIZED)
            }
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Gone(_) => StatusCode::GONE,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let detail = match self {
            Self::AuthError(e)
            | Self::TokenError(e)
            | Self::BadRequest(e)
            | Self::Forbidden(e)
            | Self::NotFound(e)
            | Self::Conflict(e)
            | Self::Gone(e) => e,
        };
        HttpResponse::build(self.status_code()).body(format!("{self}: {detail}"))
    }
}

impl From<StoreError> for APIError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidToken | StoreError::TokenExpired => {
                APIError::TokenError(e.into())
            }
            StoreError::StudentNotFound => APIError::AuthError(e.into()),
            StoreError::InvalidCode(_)
            | StoreError::TaskOrderMismatch { .. }
            | StoreError::DuplicateCode => APIError::BadRequest(e.into()),
            StoreError::TeamFull => APIError::Forbidden(e.into()),
            StoreError::TeamNotFound | StoreError::NotInTeam => {
                APIError::NotFound(e.into())
            }
            StoreError::AlreadyInTeam => APIError::Conflict(e.into()),
            StoreError::TeamInactive => APIError::Gone(e.into()),
        }
    }
}

/// Rejection for bodies that don't parse as the expected JSON.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    APIError::BadRequest(anyhow::anyhow!("{err}")).into()
}

/// Resolve the `Authorization: Bearer` header to a student.
fn get_student_id(
    req: &HttpRequest,
    store: &TeamStore,
) -> Result<StudentId, APIError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            APIError::AuthError(anyhow::anyhow!("No bearer token provided"))
        })?;
    let student_id = store.authenticate(token)?;
    // recorded here, but attaches to the span for the api route itself
    tracing::Span::current()
        .record("student_id", tracing::field::display(&student_id));
    Ok(student_id)
}

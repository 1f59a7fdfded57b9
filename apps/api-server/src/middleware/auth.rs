//! Bearer token extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use postboard_core::ports::{AuthError, TokenClaims};
use postboard_core::{Identity, Requester};
use postboard_shared::ErrorResponse;

use crate::state::AppState;

/// Who is making the request.
///
/// A request without an `Authorization` header is anonymous. A header that
/// is present but does not carry a valid bearer token is rejected with 401.
/// ```ignore
/// async fn route(caller: Caller) -> impl Responder {
///     format!("signed in: {}", caller.0.identity().is_some())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Caller(pub Requester);

impl From<TokenClaims> for Caller {
    fn from(claims: TokenClaims) -> Self {
        Self(Requester::Authenticated(Identity {
            user_id: claims.user_id,
            username: claims.username,
        }))
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let error = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired. Please sign in again."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

fn authenticate(req: &HttpRequest) -> Result<Caller, AuthenticationError> {
    let auth_header = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => value,
        None => return Ok(Caller(Requester::Anonymous)),
    };

    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AuthenticationError(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        ))
    })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        AuthenticationError(AuthError::InvalidToken(
            "Invalid authorization header".to_string(),
        ))
    })?;

    // Parse "Bearer <token>"
    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        AuthenticationError(AuthError::InvalidToken(
            "Expected Bearer token".to_string(),
        ))
    })?;

    let claims = state.tokens.validate_token(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AuthenticationError(e)
    })?;

    Ok(Caller::from(claims))
}

impl FromRequest for Caller {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

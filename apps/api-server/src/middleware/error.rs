//! Error handling middleware - RFC 7807 compliant responses and redirects.

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, http::header, web};
use postboard_core::DomainError;
use postboard_core::forms::ValidationErrors;
use postboard_shared::{ErrorResponse, FieldMessage};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fmt;

use crate::state::AppState;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound { detail: String, instance: String },
    /// The request body could not be read.
    BadRequest(String),
    Validation(ValidationErrors),
    /// Send the requester to sign in, then back to `next`.
    LoginRequired { login_url: String, next: String },
    /// Send the requester somewhere else without acting.
    Redirect(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound { detail, .. } => write!(f, "Not found: {}", detail),
            AppError::BadRequest(detail) => write!(f, "Bad request: {}", detail),
            AppError::Validation(errors) => write!(f, "Validation errors: {}", errors),
            AppError::LoginRequired { next, .. } => write!(f, "Login required for {}", next),
            AppError::Redirect(location) => write!(f, "Redirect to {}", location),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::LoginRequired { .. } | AppError::Redirect(_) => StatusCode::FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::LoginRequired { login_url, next } => {
                return HttpResponse::Found()
                    .insert_header((header::LOCATION, login_redirect(login_url, next)))
                    .finish();
            }
            AppError::Redirect(location) => {
                return HttpResponse::Found()
                    .insert_header((header::LOCATION, location.as_str()))
                    .finish();
            }
            AppError::NotFound { detail, instance } => {
                ErrorResponse::not_found(detail).with_instance(instance)
            }
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Validation(errors) => ErrorResponse::validation_failed(
                errors
                    .errors()
                    .iter()
                    .map(|e| FieldMessage {
                        field: e.field.to_string(),
                        message: e.message.clone(),
                    })
                    .collect(),
            ),
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl AppError {
    /// Translate an access layer error in the context of the request that
    /// produced it.
    pub fn from_domain(err: DomainError, req: &HttpRequest) -> Self {
        match err {
            DomainError::NotFound { entity, key } => AppError::NotFound {
                detail: format!("{} '{}' not found", entity, key),
                instance: req.path().to_string(),
            },
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::AuthenticationRequired => AppError::LoginRequired {
                login_url: req
                    .app_data::<web::Data<AppState>>()
                    .map(|state| state.login_url.clone())
                    .unwrap_or_else(|| "/auth/login/".to_string()),
                next: req.path().to_string(),
            },
            // Only the author may change a post; everyone else is sent back to it.
            DomainError::Forbidden => AppError::Redirect(req.path().to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Attach the request to an access layer result.
pub trait DomainResultExt<T> {
    fn for_request(self, req: &HttpRequest) -> AppResult<T>;
}

impl<T> DomainResultExt<T> for Result<T, DomainError> {
    fn for_request(self, req: &HttpRequest) -> AppResult<T> {
        self.map_err(|e| AppError::from_domain(e, req))
    }
}

/// Path characters left readable in `?next=`. `%` is kept so an already
/// escaped request path is not escaped twice.
const NEXT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'%');

/// `{login_url}?next={path}`, with the path escaped as a query value.
fn login_redirect(login_url: &str, next: &str) -> String {
    format!("{}?next={}", login_url, utf8_percent_encode(next, NEXT_SET))
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirect_keeps_path_readable() {
        assert_eq!(
            login_redirect("/auth/login/", "/api/profiles/NikitaF/posts/1/comments"),
            "/auth/login/?next=/api/profiles/NikitaF/posts/1/comments"
        );
    }

    #[test]
    fn test_login_redirect_escapes_query_characters() {
        assert_eq!(
            login_redirect("/auth/login/", "/api/profiles/a+b&c"),
            "/auth/login/?next=/api/profiles/a%2Bb%26c"
        );
    }

    #[test]
    fn test_login_redirect_keeps_escaped_path_as_is() {
        assert_eq!(
            login_redirect("/auth/login/", "/api/groups/%D0%9A"),
            "/auth/login/?next=/api/groups/%D0%9A"
        );
    }

    #[test]
    fn test_bad_request_is_problem_document() {
        let response = AppError::BadRequest("Json deserialize error".to_string()).error_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

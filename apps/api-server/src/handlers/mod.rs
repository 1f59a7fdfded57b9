//! HTTP handlers and route configuration.

mod groups;
mod health;
mod posts;
mod profiles;
mod render;


use actix_web::{HttpRequest, HttpResponse, web};
use postboard_shared::ErrorResponse;

use crate::middleware::auth::Caller;
use crate::middleware::error::{AppError, AppResult, DomainResultExt};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::resource("/posts")
                    .route(web::get().to(posts::index))
                    .route(web::post().to(posts::create)),
            )
            .route("/follow", web::get().to(posts::follow_index))
            .route("/groups/{slug}", web::get().to(groups::group_posts))
            .service(
                web::scope("/profiles/{username}")
                    .route("", web::get().to(profiles::profile))
                    .route("/follow", web::post().to(profiles::follow))
                    .route("/unfollow", web::post().to(profiles::unfollow))
                    .service(
                        web::resource("/posts/{id}")
                            .route(web::get().to(profiles::post_detail))
                            .route(web::put().to(profiles::edit_post)),
                    )
                    .route(
                        "/posts/{id}/comments",
                        web::post().to(profiles::add_comment),
                    ),
            ),
    );
}

/// Unwrap a submitted JSON body for a signed-in caller. Anonymous callers are
/// sent to the login page before the body is looked at.
pub(crate) fn submitted<T>(
    caller: &Caller,
    body: Result<web::Json<T>, actix_web::Error>,
    req: &HttpRequest,
) -> AppResult<T> {
    caller.0.require().for_request(req)?;
    body.map(web::Json::into_inner)
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Fallback for unknown routes.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(
        ErrorResponse::not_found("The requested page does not exist.").with_instance(req.path()),
    )
}

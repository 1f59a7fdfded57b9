//! Group pages.

use actix_web::{HttpRequest, HttpResponse, web};

use postboard_shared::dto::GroupFeedResponse;

use crate::handlers::posts::PageQuery;
use crate::handlers::render;
use crate::middleware::error::{AppResult, DomainResultExt};
use crate::state::AppState;

/// GET /api/groups/{slug}
pub async fn group_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let feed = state
        .blog
        .group_posts(&slug, &query.request())
        .await
        .for_request(&req)?;

    Ok(HttpResponse::Ok().json(GroupFeedResponse {
        group: render::group(feed.group),
        posts: render::posts(feed.page),
    }))
}

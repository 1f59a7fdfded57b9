//! Global feed, follow feed and post creation.

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use serde::Deserialize;

use postboard_core::PageRequest;
use postboard_core::forms::PostForm;

use crate::handlers::{render, submitted};
use crate::middleware::auth::Caller;
use crate::middleware::error::{AppError, AppResult, DomainResultExt};
use crate::state::AppState;

/// `?page=` as sent by the client; junk is tolerated.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref())
    }
}

fn index_cache_key(query: &PageQuery) -> String {
    format!("posts:index:{}", query.page.as_deref().unwrap_or(""))
}

/// GET /api/posts
///
/// Rendered pages are reused until the cache TTL elapses, so new posts
/// show up with a delay.
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let key = index_cache_key(&query);
    if let Some(body) = state.cache.get(&key).await {
        tracing::debug!(%key, "Serving cached feed page");
        return Ok(HttpResponse::Ok()
            .content_type("application/json")
            .body(body));
    }

    let page = state
        .blog
        .recent_posts(&query.request())
        .await
        .for_request(&req)?;
    let body = serde_json::to_string(&render::posts(page))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if let Err(e) = state
        .cache
        .set(&key, &body, Some(state.index_cache_ttl))
        .await
    {
        tracing::warn!(%key, error = %e, "Failed to cache feed page");
    }

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    caller: Caller,
    body: Result<web::Json<PostForm>, actix_web::Error>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let form = submitted(&caller, body, &req)?;
    let entry = state
        .blog
        .create_post(&caller.0, form)
        .await
        .for_request(&req)?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, render::post_location(&entry)))
        .json(render::post(entry)))
}

/// GET /api/follow
pub async fn follow_index(
    state: web::Data<AppState>,
    caller: Caller,
    query: web::Query<PageQuery>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let page = state
        .blog
        .follow_feed(&caller.0, &query.request())
        .await
        .for_request(&req)?;

    Ok(HttpResponse::Ok().json(render::posts(page)))
}

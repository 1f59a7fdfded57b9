//! Author pages, follow edges, single posts and their comments.

use actix_web::{HttpRequest, HttpResponse, http::header, web};

use postboard_core::forms::{CommentForm, PostForm};
use postboard_shared::ApiResponse;
use postboard_shared::dto::{FollowResponse, PostDetailResponse, ProfileResponse};

use crate::handlers::posts::PageQuery;
use crate::handlers::{render, submitted};
use crate::middleware::auth::Caller;
use crate::middleware::error::{AppResult, DomainResultExt};
use crate::state::AppState;

/// GET /api/profiles/{username}
pub async fn profile(
    state: web::Data<AppState>,
    caller: Caller,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let profile = state
        .blog
        .profile(&caller.0, &username, &query.request())
        .await
        .for_request(&req)?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        author: render::user(profile.author),
        following: profile.following,
        posts_count: profile.page.total_items,
        posts: render::posts(profile.page),
    }))
}

/// POST /api/profiles/{username}/follow
pub async fn follow(
    state: web::Data<AppState>,
    caller: Caller,
    username: web::Path<String>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let changed = state
        .blog
        .follow(&caller.0, &username)
        .await
        .for_request(&req)?;

    // Following oneself is a no-op.
    let following = caller
        .0
        .identity()
        .is_some_and(|me| me.username != username.as_str());

    Ok(HttpResponse::Ok().json(ApiResponse::ok(FollowResponse {
        author: username.into_inner(),
        following,
        changed,
    })))
}

/// POST /api/profiles/{username}/unfollow
pub async fn unfollow(
    state: web::Data<AppState>,
    caller: Caller,
    username: web::Path<String>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    state
        .blog
        .unfollow(&caller.0, &username)
        .await
        .for_request(&req)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(FollowResponse {
        author: username.into_inner(),
        following: false,
        changed: true,
    })))
}

/// GET /api/profiles/{username}/posts/{id}
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(String, i64)>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let detail = state
        .blog
        .post_detail(&username, post_id)
        .await
        .for_request(&req)?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: render::post(detail.entry),
        comments: detail.comments.into_iter().map(render::comment).collect(),
    }))
}

/// PUT /api/profiles/{username}/posts/{id}
///
/// Anyone but the author is redirected to the post unchanged.
pub async fn edit_post(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<(String, i64)>,
    body: Result<web::Json<PostForm>, actix_web::Error>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let form = submitted(&caller, body, &req)?;
    let entry = state
        .blog
        .edit_post(&caller.0, &username, post_id, form)
        .await
        .for_request(&req)?;

    Ok(HttpResponse::Ok().json(render::post(entry)))
}

/// POST /api/profiles/{username}/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<(String, i64)>,
    body: Result<web::Json<CommentForm>, actix_web::Error>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let form = submitted(&caller, body, &req)?;
    let entry = state
        .blog
        .add_comment(&caller.0, &username, post_id, form)
        .await
        .for_request(&req)?;

    Ok(HttpResponse::Created()
        .insert_header((
            header::LOCATION,
            format!("/api/profiles/{}/posts/{}", username, post_id),
        ))
        .json(render::comment(entry)))
}

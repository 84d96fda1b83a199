//! Post handlers.

use actix_web::{HttpResponse, web};
use validator::Validate;

use blog_core::DomainError;
use blog_core::content::parse_datetime;
use blog_core::domain::PostInput;
use blog_shared::MessageResponse;
use blog_shared::dto::PostRequest;

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppResult, field_errors};
use crate::state::AppState;

const POST: &str = "Post";

/// GET /blog/posts
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /blog/posts/{id}
pub async fn show(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or(DomainError::not_found(POST, id))?;

    Ok(HttpResponse::Ok().json(post))
}

/// POST /blog/posts
///
/// Posts written without a usable token belong to the anonymous author.
pub async fn store(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let input = post_input(&state, body.into_inner()).await?;
    let author_id = identity.author_id(state.anonymous_author_id);

    let post = state.posts.create(input.normalize(), author_id).await?;

    tracing::info!(post_id = post.post.id, author_id, "Post created");
    Ok(HttpResponse::Created().json(post))
}

/// PUT|PATCH /blog/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if state.posts.find_by_id(id).await?.is_none() {
        return Err(DomainError::not_found(POST, id).into());
    }

    let input = post_input(&state, body.into_inner()).await?;
    let post = state.posts.update(id, input.normalize()).await?;

    tracing::info!(post_id = id, "Post updated");
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /blog/posts/{id}
pub async fn destroy(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if state.posts.find_by_id(id).await?.is_none() {
        return Err(DomainError::not_found(POST, id).into());
    }

    state.posts.delete(id).await?;

    tracing::info!(post_id = id, "Post deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted")))
}

/// Validate the request, collecting field rules, date parsing and the
/// category reference into one set of errors.
async fn post_input(state: &AppState, req: PostRequest) -> AppResult<PostInput> {
    let mut errors = req
        .validate()
        .err()
        .map(|e| field_errors(&e))
        .unwrap_or_default();

    let published_at = match req.published_at {
        None => None,
        Some(None) => Some(None),
        Some(Some(raw)) => match parse_datetime(&raw) {
            Some(date) => Some(Some(date)),
            None => {
                errors.add("published_at", "The published at field must be a valid date.");
                None
            }
        },
    };

    if let Some(category_id) = req.category_id {
        if !state.categories.exists(category_id).await? {
            errors.add("category_id", "The selected category id is invalid.");
        }
    }

    errors.into_result()?;

    Ok(PostInput {
        title: req.title.unwrap_or_default(),
        slug: req.slug,
        excerpt: req.excerpt,
        content_raw: req.content_raw,
        content_html: req.content_html,
        category_id: req.category_id.unwrap_or_default(),
        is_published: req.is_published,
        published_at,
    })
}

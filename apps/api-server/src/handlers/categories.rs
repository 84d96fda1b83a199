//! Category handlers.

use actix_web::{HttpResponse, web};
use validator::Validate;

use blog_core::DomainError;
use blog_core::domain::CategoryDraft;
use blog_shared::dto::CategoryRequest;
use blog_shared::{CategoryUpdatedResponse, DataResponse, MessageResponse};

use crate::middleware::error::{AppResult, field_errors};
use crate::state::AppState;

const CATEGORY: &str = "Category";

/// GET /blog/categories
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list().await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(categories)))
}

/// GET /blog/categories/{id}
pub async fn show(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or(DomainError::not_found(CATEGORY, id))?;

    Ok(HttpResponse::Ok().json(category))
}

/// POST /blog/categories
pub async fn store(
    state: web::Data<AppState>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let draft = category_draft(&state, body.into_inner()).await?;
    let category = state.categories.create(draft).await?;

    tracing::info!(category_id = category.category.id, "Category created");
    Ok(HttpResponse::Created().json(category))
}

/// PUT|PATCH /blog/categories/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    ensure_exists(&state, id).await?;

    let draft = category_draft(&state, body.into_inner()).await?;
    let category = state.categories.update(id, draft).await?;

    tracing::info!(category_id = id, "Category updated");
    Ok(HttpResponse::Ok().json(CategoryUpdatedResponse {
        message: "Category updated".to_string(),
        category,
    }))
}

/// DELETE /blog/categories/{id}
pub async fn destroy(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    ensure_exists(&state, id).await?;

    state.categories.delete(id).await?;

    tracing::info!(category_id = id, "Category deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Category deleted")))
}

async fn ensure_exists(state: &AppState, id: i64) -> AppResult<()> {
    if state.categories.exists(id).await? {
        Ok(())
    } else {
        Err(DomainError::not_found(CATEGORY, id).into())
    }
}

/// Validate the request and resolve it into a draft with its slug filled in.
async fn category_draft(state: &AppState, req: CategoryRequest) -> AppResult<CategoryDraft> {
    let mut errors = req
        .validate()
        .err()
        .map(|e| field_errors(&e))
        .unwrap_or_default();

    if let Some(parent_id) = req.parent_id {
        if !state.categories.exists(parent_id).await? {
            errors.add("parent_id", "The selected parent id is invalid.");
        }
    }

    errors.into_result()?;

    Ok(CategoryDraft::new(
        req.title.unwrap_or_default(),
        req.slug,
        req.parent_id,
    ))
}

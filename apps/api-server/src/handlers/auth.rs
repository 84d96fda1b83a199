//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use blog_core::DomainError;
use blog_core::domain::NewUser;
use blog_core::ports::AuthError;
use blog_core::ports::{PasswordService, TokenService};
use blog_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let mut req = body.into_inner();
    req.email = req.email.trim().to_string();
    req.validate()?;

    // Check if user already exists
    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(DomainError::Duplicate("Email already registered".to_string()).into());
    }

    let password_hash = password_service.hash(&req.password)?;

    let user = state
        .users
        .create(NewUser {
            name: req.name.unwrap_or_default(),
            email: req.email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = user.id, "User registered");
    let response = token_response(token_service.get_ref().as_ref(), user.id, &user.email)?;
    Ok(HttpResponse::Created().json(response))
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_email(req.email.trim())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !password_service.verify(&req.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    let response = token_response(token_service.get_ref().as_ref(), user.id, &user.email)?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /user - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    // A valid token can outlive its user, or name an id since reused
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .filter(|user| user.email == identity.email)
        .ok_or(DomainError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        created_at: user.created_at.to_rfc3339(),
    }))
}

fn token_response(
    token_service: &dyn TokenService,
    user_id: i64,
    email: &str,
) -> AppResult<AuthResponse> {
    let token = token_service.generate_token(user_id, email)?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds().max(0) as u64,
    })
}

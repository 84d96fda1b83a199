//! Authentication extractors.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::future::{Ready, ready};
use std::sync::Arc;

use blog_core::ports::{AuthError, TokenClaims, TokenService};
use blog_shared::ErrorResponse;

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
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
        match &self.0 {
            AuthError::HashingError(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            _ => actix_web::http::StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let error = match &self.0 {
            AuthError::HashingError(_) => ErrorResponse::internal_error(),
            _ => ErrorResponse::unauthorized(),
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(AuthenticationError))
    }
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthError> {
    let Some(token_service) = req.app_data::<actix_web::web::Data<Arc<dyn TokenService>>>() else {
        tracing::error!("TokenService not found in app data");
        return Err(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        ));
    };

    let auth_str = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    // Parse "Bearer <token>"
    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?;

    token_service.validate_token(token.trim()).map(Identity::from)
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    /// The signed-in user's id, or `anonymous` when nobody is signed in.
    pub fn author_id(&self, anonymous: i64) -> i64 {
        self.0.as_ref().map_or(anonymous, |identity| identity.user_id)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match authenticate(req) {
            Ok(identity) => ready(Ok(OptionalIdentity(Some(identity)))),
            Err(AuthError::MissingAuth) => ready(Ok(OptionalIdentity(None))),
            Err(e) => {
                tracing::debug!("Ignoring unusable credentials: {}", e);
                ready(Ok(OptionalIdentity(None)))
            }
        }
    }
}

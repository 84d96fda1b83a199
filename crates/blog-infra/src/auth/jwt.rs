//! JWT token service implementation.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use blog_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// Longest token lifetime accepted from the environment: one year.
const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "blog-api".to_string(),
        }
    }
}

impl JwtConfig {
    /// Load from `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secret = std::env::var("JWT_SECRET").unwrap_or(defaults.secret);

        // Warn if using default secret in production
        if secret == DEFAULT_SECRET {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        Self {
            secret,
            expiration_hours: expiration_hours(
                std::env::var("JWT_EXPIRATION_HOURS").ok().as_deref(),
                defaults.expiration_hours,
            ),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }
}

/// Parse a token lifetime, keeping `default` for anything outside `1..=MAX_EXPIRATION_HOURS`.
fn expiration_hours(raw: Option<&str>, default: i64) -> i64 {
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().parse::<i64>() {
        Ok(hours) if (1..=MAX_EXPIRATION_HOURS).contains(&hours) => hours,
        _ => {
            tracing::warn!(
                value = raw,
                max = MAX_EXPIRATION_HOURS,
                "Ignoring JWT_EXPIRATION_HOURS, using {default}"
            );
            default
        }
    }
}

/// Internal JWT claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user id
    email: String,
    exp: i64,
    iat: i64,
    iss: String,
}

/// JWT-based token service.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user_id: i64, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = TimeDelta::try_hours(self.config.expiration_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| AuthError::InvalidToken("Token lifetime out of range".to_string()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let user_id = token_data
            .claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken("Malformed subject".to_string()))?;

        Ok(TokenClaims {
            user_id,
            email: token_data.claims.email,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_hours.saturating_mul(3600)
    }
}

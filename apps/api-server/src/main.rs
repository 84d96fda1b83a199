//! # Blog API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use blog_core::ports::{PasswordService, TokenService};
use blog_infra::{Argon2PasswordService, JwtTokenService};

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Tracing first, so configuration warnings are not lost
    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Blog API Server on {}:{} (prefix {:?})",
        config.host,
        config.port,
        config.api_prefix
    );

    // Build application state
    let state = AppState::new(&config).await;

    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
    let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

    let api_prefix = config.api_prefix.clone();

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .app_data(web::Data::new(password_service.clone()))
            .service(web::scope(&api_prefix).configure(handlers::configure_routes))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

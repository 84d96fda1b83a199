//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod health;
mod posts;


use actix_web::{HttpRequest, error, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        // Public routes
        .route("/health", web::get().to(health::health_check))
        // Identity
        .route("/user", web::get().to(auth::me))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login)),
        )
        // Blog resources
        .service(
            web::scope("/blog")
                .service(
                    web::resource("/categories")
                        .route(web::get().to(categories::index))
                        .route(web::post().to(categories::store)),
                )
                .service(
                    web::resource("/categories/{id}")
                        .route(web::get().to(categories::show))
                        .route(web::put().to(categories::update))
                        .route(web::patch().to(categories::update))
                        .route(web::delete().to(categories::destroy)),
                )
                .service(
                    web::resource("/posts")
                        .route(web::get().to(posts::index))
                        .route(web::post().to(posts::store)),
                )
                .service(
                    web::resource("/posts/{id}")
                        .route(web::get().to(posts::show))
                        .route(web::put().to(posts::update))
                        .route(web::patch().to(posts::update))
                        .route(web::delete().to(posts::destroy)),
                ),
        );
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Rejected request body: {}", err);

    let message = match &err {
        // Field rules checked while decoding carry their own message
        error::JsonPayloadError::Deserialize(inner) if inner.is_data() => {
            let text = inner.to_string();
            match text.rsplit_once(" at line ") {
                Some((message, _)) => message.to_string(),
                None => text,
            }
        }
        _ => err.to_string(),
    };

    AppError::Unprocessable(message).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Rejected path: {}", err);
    AppError::NotFound("Resource not found".to_string()).into()
}

//! Route table shared by the server binary and the integration tests.

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::handlers::{consultations, messages, system};
use actix_cors::Cors;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(system::root))
        .route("/test", web::get().to(system::diagnostics))
        .service(
            web::scope("/api")
                .route("/hello", web::get().to(system::hello))
                .route(
                    "/consultations",
                    web::post().to(consultations::create_consultation),
                )
                .route(
                    "/consultations",
                    web::get().to(consultations::list_consultations),
                )
                .route(
                    "/consultations/{id}",
                    web::get().to(consultations::get_consultation),
                )
                .route(
                    "/consultations/{id}/messages",
                    web::get().to(messages::list_messages),
                )
                .route(
                    "/consultations/{id}/messages",
                    web::post().to(messages::send_message),
                ),
        );
}

/// Malformed or incomplete JSON bodies become `invalid_request` errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into())
}

pub fn cors(config: &ApiConfig) -> Cors {
    if config.cors_allows_any_origin() {
        return Cors::permissive();
    }

    let origins = config
        .cors
        .as_ref()
        .map(|c| c.allowed_origins.as_slice())
        .unwrap_or_default();

    origins.iter().fold(
        Cors::default()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600),
        |cors, origin| cors.allowed_origin(origin),
    )
}

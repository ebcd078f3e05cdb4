#![doc = "The `stockroom` library crate."]
#![doc = ""]
#![doc = "Domain models, storage, authentication, routing and error handling for the"]
#![doc = "Stockroom inventory service. The binary in `main.rs` wires these together."]

pub mod auth;
pub mod config;
pub mod docs;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

use actix_web::web;

pub use crate::error::{AppError, AppResult};
pub use crate::state::AppState;

/// Mounts the health probe, the API documentation and the authenticated `/api` scope.
///
/// `AppState` must be registered as `web::Data` on the enclosing `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::health::health)
        .configure(docs::config)
        .service(
            web::scope("/api")
                .wrap(auth::AuthMiddleware)
                .configure(routes::config),
        );
}

pub mod auth;
pub mod categories;
pub mod health;
pub mod products;
pub mod stock;

use actix_web::{web, HttpRequest};

use crate::error::AppError;

/// Registers every `/api` route. Mount it inside a scope wrapped by
/// [`crate::auth::AuthMiddleware`].
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login)
                .service(auth::me),
        )
        .service(
            web::scope("/categories")
                .service(categories::list_categories)
                .service(categories::create_category)
                .service(categories::get_category)
                .service(categories::update_category),
        )
        .service(
            web::scope("/products")
                .service(products::list_products)
                .service(products::create_product)
                .service(products::get_product)
                .service(products::update_product)
                .service(products::delete_product)
                .service(products::list_product_movements),
        )
        .service(
            web::scope("/stock")
                .service(stock::record_movement)
                .service(stock::get_movement),
        );
}

/// Fallback for unmatched routes, so clients always receive a JSON error body.
pub async fn not_found(req: HttpRequest) -> Result<actix_web::HttpResponse, AppError> {
    Err(AppError::NotFound(format!(
        "No route for {} {}",
        req.method(),
        req.path()
    )))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

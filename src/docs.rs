//! OpenAPI document and the interactive documentation served from it.

use actix_web::{get, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};

use crate::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::{
    Category, CategoryInput, Product, ProductInput, StockDirection, StockMovement,
    StockMovementInput, UserProfile,
};
use crate::routes;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockroom API",
        description = "Inventory management: products, categories and stock movements"
    ),
    paths(
        routes::auth::register,
        routes::auth::login,
        routes::auth::me,
        routes::categories::list_categories,
        routes::categories::create_category,
        routes::categories::get_category,
        routes::categories::update_category,
        routes::products::list_products,
        routes::products::create_product,
        routes::products::get_product,
        routes::products::update_product,
        routes::products::delete_product,
        routes::products::list_product_movements,
        routes::stock::record_movement,
        routes::stock::get_movement,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        UserProfile,
        Category,
        CategoryInput,
        Product,
        ProductInput,
        StockDirection,
        StockMovement,
        StockMovementInput,
        ErrorResponse
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "categories", description = "Product categories"),
        (name = "products", description = "Product catalogue"),
        (name = "stock", description = "Stock movements")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[get("/api-docs/openapi.json")]
async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serves the raw document plus Redoc at `/redoc` and RapiDoc at `/rapidoc`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi_json)
        .service(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .service(RapiDoc::new(OPENAPI_JSON_PATH).path("/rapidoc"));
}

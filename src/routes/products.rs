use crate::{
    auth::AuthenticatedUser,
    docs::ErrorResponse,
    error::AppError,
    models::{Product, ProductInput, StockMovement},
    services,
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

/// Lists every product.
///
/// Products come back oldest first, ties broken by id, so repeated calls
/// return the same order.
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    responses((status = 200, description = "All products", body = Vec<Product>))
)]
#[get("")]
pub async fn list_products(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let products = services::products::list(state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(products))
}

/// Creates a product in an existing category.
///
/// The authenticated user is recorded as `created_by`. `quantity_on_hand`
/// defaults to 0.
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "products",
    request_body = ProductInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
#[post("")]
pub async fn create_product(
    state: web::Data<AppState>,
    product_data: web::Json<ProductInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let product =
        services::products::create(state.store.as_ref(), product_data.into_inner(), user.id)
            .await?;
    Ok(HttpResponse::Created().json(product))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = Product),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
#[get("/{id}")]
pub async fn get_product(
    state: web::Data<AppState>,
    product_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let product = services::products::get(state.store.as_ref(), product_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Replaces a product.
///
/// Omitting `quantity_on_hand` keeps the current stock level.
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = ProductInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Product or category not found", body = ErrorResponse)
    )
)]
#[put("/{id}")]
pub async fn update_product(
    state: web::Data<AppState>,
    product_id: web::Path<Uuid>,
    product_data: web::Json<ProductInput>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let product = services::products::update(
        state.store.as_ref(),
        product_id.into_inner(),
        product_data.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Deletes a product that has no recorded stock movements.
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 409, description = "Product has stock movements", body = ErrorResponse)
    )
)]
#[delete("/{id}")]
pub async fn delete_product(
    state: web::Data<AppState>,
    product_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let product_id = product_id.into_inner();
    services::products::delete(state.store.as_ref(), product_id).await?;
    log::debug!("Product {} deleted by {}", product_id, user.username);
    Ok(HttpResponse::NoContent().finish())
}

/// Lists a product's stock movements, oldest first.
#[utoipa::path(
    get,
    path = "/api/products/{id}/movements",
    tag = "stock",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Movements of the product", body = Vec<StockMovement>),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
#[get("/{id}/movements")]
pub async fn list_product_movements(
    state: web::Data<AppState>,
    product_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let movements =
        services::stock::list_for_product(state.store.as_ref(), product_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(movements))
}

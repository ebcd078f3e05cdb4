use crate::{
    auth::AuthenticatedUser,
    docs::ErrorResponse,
    error::AppError,
    models::{Category, CategoryInput},
    services,
    state::AppState,
};
use actix_web::{get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

/// Lists all categories, ordered by name.
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses((status = 200, description = "All categories", body = Vec<Category>))
)]
#[get("")]
pub async fn list_categories(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let categories = services::categories::list(state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// Creates a category. Names are unique.
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CategoryInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 409, description = "Name already used", body = ErrorResponse)
    )
)]
#[post("")]
pub async fn create_category(
    state: web::Data<AppState>,
    category_data: web::Json<CategoryInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let category =
        services::categories::create(state.store.as_ref(), category_data.into_inner()).await?;
    log::debug!("Category {} created by {}", category.id, user.username);
    Ok(HttpResponse::Created().json(category))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "The category", body = Category),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
#[get("/{id}")]
pub async fn get_category(
    state: web::Data<AppState>,
    category_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let category = services::categories::get(state.store.as_ref(), category_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(category))
}

/// Replaces a category's name and description.
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category id")),
    request_body = CategoryInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Name already used", body = ErrorResponse)
    )
)]
#[put("/{id}")]
pub async fn update_category(
    state: web::Data<AppState>,
    category_id: web::Path<Uuid>,
    category_data: web::Json<CategoryInput>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let category = services::categories::update(
        state.store.as_ref(),
        category_id.into_inner(),
        category_data.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(category))
}

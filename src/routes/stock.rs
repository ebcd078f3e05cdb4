use crate::{
    auth::AuthenticatedUser,
    docs::ErrorResponse,
    error::AppError,
    models::{StockMovement, StockMovementInput},
    services,
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use uuid::Uuid;

/// Records a stock entry or exit.
///
/// The product's `quantity_on_hand` moves by `quantity` in the same
/// transaction. An exit larger than the stock on hand is rejected.
#[utoipa::path(
    post,
    path = "/api/stock/movements",
    tag = "stock",
    request_body = StockMovementInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Movement recorded", body = StockMovement),
        (status = 400, description = "Invalid input or insufficient stock", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
#[post("/movements")]
pub async fn record_movement(
    state: web::Data<AppState>,
    movement_data: web::Json<StockMovementInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let movement =
        services::stock::record(state.store.as_ref(), movement_data.into_inner(), user.id).await?;
    Ok(HttpResponse::Created().json(movement))
}

#[utoipa::path(
    get,
    path = "/api/stock/movements/{id}",
    tag = "stock",
    params(("id" = Uuid, Path, description = "Movement id")),
    responses(
        (status = 200, description = "The movement", body = StockMovement),
        (status = 404, description = "Movement not found", body = ErrorResponse)
    )
)]
#[get("/movements/{id}")]
pub async fn get_movement(
    state: web::Data<AppState>,
    movement_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let movement = services::stock::get(state.store.as_ref(), movement_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(movement))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Whether stock enters or leaves the inventory.
/// Corresponds to the `stock_direction` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema)]
#[sqlx(type_name = "stock_direction", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StockDirection {
    Entry,
    Exit,
}

impl StockDirection {
    /// Signed change to the quantity on hand for a movement of `quantity` units.
    pub fn delta(self, quantity: i32) -> i32 {
        match self {
            StockDirection::Entry => quantity,
            StockDirection::Exit => -quantity,
        }
    }
}

/// An append-only record of stock entering or leaving.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub direction: StockDirection,
    pub quantity: i32,
    pub note: Option<String>,
    pub recorded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a stock movement.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct StockMovementInput {
    pub product_id: Uuid,
    pub direction: StockDirection,
    /// Must be greater than zero.
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

impl StockMovement {
    pub fn new(input: StockMovementInput, recorded_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id: input.product_id,
            direction: input.direction,
            quantity: input.quantity,
            note: input.note,
            recorded_by,
            created_at: Utc::now(),
        }
    }
}

/// Applies a movement to a stock level, refusing to go below zero.
pub fn adjusted_quantity(
    on_hand: i32,
    direction: StockDirection,
    quantity: i32,
) -> Result<i32, String> {
    match on_hand.checked_add(direction.delta(quantity)) {
        Some(next) if next >= 0 => Ok(next),
        Some(_) => Err(format!(
            "Insufficient stock: {} on hand, {} requested",
            on_hand, quantity
        )),
        None => Err("Stock quantity out of range".to_string()),
    }
}

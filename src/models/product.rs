use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A product held in inventory.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Unit price, always greater than zero.
    pub price: f64,
    /// Units currently in stock. Adjusted by every recorded stock movement.
    pub quantity_on_hand: i32,
    pub image_url: Option<String>,
    pub category_id: Uuid,
    /// The user who created the product.
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Must be at least 0.01.
    #[validate(range(min = 0.01))]
    pub price: f64,

    /// Starting stock on create (defaults to 0). On update, leaving it out keeps
    /// the current quantity.
    #[validate(range(min = 0))]
    pub quantity_on_hand: Option<i32>,

    #[validate(url)]
    pub image_url: Option<String>,

    pub category_id: Uuid,
}

impl Product {
    pub fn new(input: ProductInput, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            price: input.price,
            quantity_on_hand: input.quantity_on_hand.unwrap_or(0),
            image_url: input.image_url,
            category_id: input.category_id,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the editable fields, keeping the stock level when the input omits it.
    pub fn apply(&mut self, input: ProductInput) {
        self.name = input.name;
        self.description = input.description;
        self.price = input.price;
        if let Some(quantity) = input.quantity_on_hand {
            self.quantity_on_hand = quantity;
        }
        self.image_url = input.image_url;
        self.category_id = input.category_id;
        self.updated_at = Utc::now();
    }
}

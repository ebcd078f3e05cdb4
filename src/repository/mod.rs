//! Persistence traits and their implementations.
//!
//! [`PgStore`] talks to PostgreSQL through a `sqlx` pool. [`InMemoryStore`]
//! keeps everything in process and backs the test suite.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{
    Category, CategoryInput, NewUser, Product, ProductInput, StockMovement, StockMovementInput,
    User,
};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with `Conflict` if the username is taken.
    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category. Fails with `Conflict` on a duplicate name.
    async fn create_category(&self, input: CategoryInput) -> AppResult<Category>;

    /// All categories, ordered by name.
    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    async fn get_category(&self, id: Uuid) -> AppResult<Option<Category>>;

    /// Replace a category. `Ok(None)` when it does not exist.
    async fn update_category(&self, id: Uuid, input: CategoryInput)
        -> AppResult<Option<Category>>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product. Fails with `NotFound` if the category does not exist.
    async fn create_product(&self, input: ProductInput, created_by: Uuid) -> AppResult<Product>;

    /// All products, oldest first with ties broken by id.
    async fn list_products(&self) -> AppResult<Vec<Product>>;

    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// Replace a product. `Ok(None)` when it does not exist; `NotFound` error
    /// when the new category does not exist.
    async fn update_product(&self, id: Uuid, input: ProductInput) -> AppResult<Option<Product>>;

    /// Delete a product. `Ok(false)` when it does not exist; `Conflict` when
    /// movements have been recorded against it.
    async fn delete_product(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait StockMovementRepository: Send + Sync {
    /// Persist a movement and adjust the product's quantity in one transaction.
    ///
    /// Fails with `NotFound` for an unknown product and `BadRequest` when an
    /// exit exceeds the quantity on hand.
    async fn record_movement(
        &self,
        input: StockMovementInput,
        recorded_by: Uuid,
    ) -> AppResult<StockMovement>;

    async fn get_movement(&self, id: Uuid) -> AppResult<Option<StockMovement>>;

    /// Movements of one product, oldest first.
    async fn list_movements_for_product(&self, product_id: Uuid) -> AppResult<Vec<StockMovement>>;
}

/// Everything the HTTP layer needs from a storage backend.
pub trait Store:
    UserRepository + CategoryRepository + ProductRepository + StockMovementRepository
{
}

impl<T> Store for T where
    T: UserRepository + CategoryRepository + ProductRepository + StockMovementRepository
{
}

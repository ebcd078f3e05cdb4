use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    stock::adjusted_quantity, Category, CategoryInput, NewUser, Product, ProductInput,
    StockMovement, StockMovementInput, User,
};
use crate::repository::{
    CategoryRepository, ProductRepository, StockMovementRepository, UserRepository,
};

/// PostgreSQL-backed store. Cloning shares the underlying pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the migrations embedded from `migrations/`.
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Rewrites the generic message of a `Conflict` coming from a unique constraint.
fn on_conflict(message: String) -> impl FnOnce(sqlx::Error) -> AppError {
    move |error| match AppError::from(error) {
        AppError::Conflict(_) => AppError::Conflict(message),
        other => other,
    }
}

/// Rewrites the generic message of a `NotFound` coming from a foreign key.
fn on_missing_reference(message: String) -> impl FnOnce(sqlx::Error) -> AppError {
    move |error| match AppError::from(error) {
        AppError::NotFound(_) => AppError::NotFound(message),
        other => other,
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, password_hash)
             VALUES ($1, $2, $3)
             RETURNING id, username, password_hash, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(on_conflict(format!(
            "Username '{}' is already taken",
            user.username
        )))
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at, updated_at
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl CategoryRepository for PgStore {
    async fn create_category(&self, input: CategoryInput) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name, description)
             VALUES ($1, $2, $3)
             RETURNING id, name, description, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await
        .map_err(on_conflict(format!(
            "Category '{}' already exists",
            input.name
        )))
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at, updated_at
             FROM categories ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn get_category(&self, id: Uuid) -> AppResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at, updated_at
             FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    async fn update_category(
        &self,
        id: Uuid,
        input: CategoryInput,
    ) -> AppResult<Option<Category>> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories
             SET name = $1, description = $2, updated_at = NOW()
             WHERE id = $3
             RETURNING id, name, description, created_at, updated_at",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(on_conflict(format!(
            "Category '{}' already exists",
            input.name
        )))
    }
}

#[async_trait]
impl ProductRepository for PgStore {
    async fn create_product(&self, input: ProductInput, created_by: Uuid) -> AppResult<Product> {
        let product = Product::new(input, created_by);
        sqlx::query_as::<_, Product>(
            "INSERT INTO products
                (id, name, description, price, quantity_on_hand, image_url, category_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id, name, description, price, quantity_on_hand, image_url,
                       category_id, created_by, created_at, updated_at",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.quantity_on_hand)
        .bind(&product.image_url)
        .bind(product.category_id)
        .bind(product.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(on_missing_reference(format!(
            "Category {} not found",
            product.category_id
        )))
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, quantity_on_hand, image_url,
                    category_id, created_by, created_at, updated_at
             FROM products ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, quantity_on_hand, image_url,
                    category_id, created_by, created_at, updated_at
             FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    async fn update_product(&self, id: Uuid, input: ProductInput) -> AppResult<Option<Product>> {
        sqlx::query_as::<_, Product>(
            "UPDATE products
             SET name = $1, description = $2, price = $3,
                 quantity_on_hand = COALESCE($4, quantity_on_hand),
                 image_url = $5, category_id = $6, updated_at = NOW()
             WHERE id = $7
             RETURNING id, name, description, price, quantity_on_hand, image_url,
                       category_id, created_by, created_at, updated_at",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.quantity_on_hand)
        .bind(&input.image_url)
        .bind(input.category_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(on_missing_reference(format!(
            "Category {} not found",
            input.category_id
        )))
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM products WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !exists {
            return Ok(false);
        }

        let has_movements = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM stock_movements WHERE product_id = $1)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if has_movements {
            return Err(AppError::Conflict(format!(
                "Product {} has recorded stock movements and cannot be deleted",
                id
            )));
        }

        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }
}

#[async_trait]
impl StockMovementRepository for PgStore {
    async fn record_movement(
        &self,
        input: StockMovementInput,
        recorded_by: Uuid,
    ) -> AppResult<StockMovement> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent movements on the same product.
        let on_hand = sqlx::query_scalar::<_, i32>(
            "SELECT quantity_on_hand FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(input.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", input.product_id)))?;

        let next = adjusted_quantity(on_hand, input.direction, input.quantity)
            .map_err(AppError::BadRequest)?;

        let movement = StockMovement::new(input, recorded_by);
        let movement = sqlx::query_as::<_, StockMovement>(
            "INSERT INTO stock_movements (id, product_id, direction, quantity, note, recorded_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, product_id, direction, quantity, note, recorded_by, created_at",
        )
        .bind(movement.id)
        .bind(movement.product_id)
        .bind(movement.direction)
        .bind(movement.quantity)
        .bind(&movement.note)
        .bind(movement.recorded_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE products SET quantity_on_hand = $1, updated_at = NOW() WHERE id = $2")
            .bind(next)
            .bind(movement.product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(movement)
    }

    async fn get_movement(&self, id: Uuid) -> AppResult<Option<StockMovement>> {
        let movement = sqlx::query_as::<_, StockMovement>(
            "SELECT id, product_id, direction, quantity, note, recorded_by, created_at
             FROM stock_movements WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(movement)
    }

    async fn list_movements_for_product(&self, product_id: Uuid) -> AppResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            "SELECT id, product_id, direction, quantity, note, recorded_by, created_at
             FROM stock_movements WHERE product_id = $1
             ORDER BY created_at, id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }
}

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    stock::adjusted_quantity, Category, CategoryInput, NewUser, Product, ProductInput,
    StockMovement, StockMovementInput, User,
};
use crate::repository::{
    CategoryRepository, ProductRepository, StockMovementRepository, UserRepository,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    products: HashMap<Uuid, Product>,
    movements: Vec<StockMovement>,
}

/// In-memory store for tests and local experiments.
///
/// All tables sit behind one lock, so every operation is atomic with respect
/// to the others, mirroring the transactions of the PostgreSQL store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn create_category(&self, input: CategoryInput) -> AppResult<Category> {
        let mut tables = self.tables.write().await;

        if tables.categories.values().any(|c| c.name == input.name) {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                input.name
            )));
        }

        let category = Category::new(input);
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn get_category(&self, id: Uuid) -> AppResult<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.get(&id).cloned())
    }

    async fn update_category(
        &self,
        id: Uuid,
        input: CategoryInput,
    ) -> AppResult<Option<Category>> {
        let mut tables = self.tables.write().await;

        if !tables.categories.contains_key(&id) {
            return Ok(None);
        }
        if tables
            .categories
            .values()
            .any(|c| c.id != id && c.name == input.name)
        {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                input.name
            )));
        }

        Ok(tables.categories.get_mut(&id).map(|category| {
            category.name = input.name;
            category.description = input.description;
            category.updated_at = Utc::now();
            category.clone()
        }))
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn create_product(&self, input: ProductInput, created_by: Uuid) -> AppResult<Product> {
        let mut tables = self.tables.write().await;

        if !tables.categories.contains_key(&input.category_id) {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                input.category_id
            )));
        }

        let product = Product::new(input, created_by);
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut products: Vec<Product> = tables.products.values().cloned().collect();
        products.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.get(&id).cloned())
    }

    async fn update_product(&self, id: Uuid, input: ProductInput) -> AppResult<Option<Product>> {
        let mut tables = self.tables.write().await;

        if !tables.products.contains_key(&id) {
            return Ok(None);
        }
        if !tables.categories.contains_key(&input.category_id) {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                input.category_id
            )));
        }

        Ok(tables.products.get_mut(&id).map(|product| {
            product.apply(input);
            product.clone()
        }))
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;

        if !tables.products.contains_key(&id) {
            return Ok(false);
        }
        if tables.movements.iter().any(|m| m.product_id == id) {
            return Err(AppError::Conflict(format!(
                "Product {} has recorded stock movements and cannot be deleted",
                id
            )));
        }

        tables.products.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl StockMovementRepository for InMemoryStore {
    async fn record_movement(
        &self,
        input: StockMovementInput,
        recorded_by: Uuid,
    ) -> AppResult<StockMovement> {
        let mut tables = self.tables.write().await;

        let product = tables
            .products
            .get_mut(&input.product_id)
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", input.product_id)))?;

        product.quantity_on_hand =
            adjusted_quantity(product.quantity_on_hand, input.direction, input.quantity)
                .map_err(AppError::BadRequest)?;
        product.updated_at = Utc::now();

        let movement = StockMovement::new(input, recorded_by);
        tables.movements.push(movement.clone());
        Ok(movement)
    }

    async fn get_movement(&self, id: Uuid) -> AppResult<Option<StockMovement>> {
        let tables = self.tables.read().await;
        Ok(tables.movements.iter().find(|m| m.id == id).cloned())
    }

    async fn list_movements_for_product(&self, product_id: Uuid) -> AppResult<Vec<StockMovement>> {
        let tables = self.tables.read().await;
        Ok(tables
            .movements
            .iter()
            .filter(|m| m.product_id == product_id)
            .cloned()
            .collect())
    }
}

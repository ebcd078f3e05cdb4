use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{Product, ProductInput};
use crate::repository::Store;
use crate::services::auth::require_user;

pub async fn create(store: &dyn Store, input: ProductInput, created_by: Uuid) -> AppResult<Product> {
    input.validate()?;
    require_user(store, created_by).await?;
    ensure_category(store, input.category_id).await?;

    let product = store.create_product(input, created_by).await?;
    log::info!("Created product {} ({})", product.name, product.id);
    Ok(product)
}

pub async fn list(store: &dyn Store) -> AppResult<Vec<Product>> {
    store.list_products().await
}

pub async fn get(store: &dyn Store, id: Uuid) -> AppResult<Product> {
    store.get_product(id).await?.ok_or_else(|| not_found(id))
}

pub async fn update(store: &dyn Store, id: Uuid, input: ProductInput) -> AppResult<Product> {
    input.validate()?;
    ensure_category(store, input.category_id).await?;

    store
        .update_product(id, input)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn delete(store: &dyn Store, id: Uuid) -> AppResult<()> {
    if !store.delete_product(id).await? {
        return Err(not_found(id));
    }
    log::info!("Deleted product {}", id);
    Ok(())
}

async fn ensure_category(store: &dyn Store, category_id: Uuid) -> AppResult<()> {
    match store.get_category(category_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(format!(
            "Category {} not found",
            category_id
        ))),
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Product {} not found", id))
}

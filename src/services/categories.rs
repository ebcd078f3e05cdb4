use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{Category, CategoryInput};
use crate::repository::Store;

pub async fn create(store: &dyn Store, input: CategoryInput) -> AppResult<Category> {
    input.validate()?;
    let category = store.create_category(input).await?;
    log::info!("Created category {} ({})", category.name, category.id);
    Ok(category)
}

pub async fn list(store: &dyn Store) -> AppResult<Vec<Category>> {
    store.list_categories().await
}

pub async fn get(store: &dyn Store, id: Uuid) -> AppResult<Category> {
    store.get_category(id).await?.ok_or_else(|| not_found(id))
}

pub async fn update(store: &dyn Store, id: Uuid, input: CategoryInput) -> AppResult<Category> {
    input.validate()?;
    store
        .update_category(id, input)
        .await?
        .ok_or_else(|| not_found(id))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Category {} not found", id))
}

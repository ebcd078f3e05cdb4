use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{StockMovement, StockMovementInput};
use crate::repository::Store;
use crate::services::auth::require_user;

/// Records a movement and adjusts the product's quantity on hand.
pub async fn record(
    store: &dyn Store,
    input: StockMovementInput,
    recorded_by: Uuid,
) -> AppResult<StockMovement> {
    input.validate()?;
    require_user(store, recorded_by).await?;

    let movement = store.record_movement(input, recorded_by).await?;
    log::info!(
        "Recorded {:?} of {} for product {}",
        movement.direction,
        movement.quantity,
        movement.product_id
    );
    Ok(movement)
}

pub async fn get(store: &dyn Store, id: Uuid) -> AppResult<StockMovement> {
    store
        .get_movement(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Stock movement {} not found", id)))
}

pub async fn list_for_product(store: &dyn Store, product_id: Uuid) -> AppResult<Vec<StockMovement>> {
    if store.get_product(product_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Product {} not found",
            product_id
        )));
    }
    store.list_movements_for_product(product_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryInput, NewUser, ProductInput, StockDirection};
    use crate::repository::{CategoryRepository, InMemoryStore, ProductRepository, UserRepository};

    async fn user(store: &InMemoryStore) -> Uuid {
        store
            .create_user(NewUser {
                username: "keeper".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap()
            .id
    }

    async fn product_with_stock(store: &InMemoryStore, quantity: i32) -> Uuid {
        let category = store
            .create_category(CategoryInput {
                name: "Dairy".into(),
                description: None,
            })
            .await
            .unwrap();
        store
            .create_product(
                ProductInput {
                    name: "Milk".into(),
                    description: None,
                    price: 0.99,
                    quantity_on_hand: Some(quantity),
                    image_url: None,
                    category_id: category.id,
                },
                Uuid::new_v4(),
            )
            .await
            .unwrap()
            .id
    }

    #[actix_rt::test]
    async fn test_record_and_fetch() {
        let store = InMemoryStore::new();
        let product_id = product_with_stock(&store, 0).await;
        let recorder = user(&store).await;

        let movement = record(
            &store,
            StockMovementInput {
                product_id,
                direction: StockDirection::Entry,
                quantity: 24,
                note: Some("weekly delivery".into()),
            },
            recorder,
        )
        .await
        .unwrap();

        assert_eq!(movement.recorded_by, recorder);
        let fetched = get(&store, movement.id).await.unwrap();
        assert_eq!(fetched.note.as_deref(), Some("weekly delivery"));
        assert_eq!(store.get_product(product_id).await.unwrap().unwrap().quantity_on_hand, 24);
    }

    #[actix_rt::test]
    async fn test_record_rejects_non_positive_quantity() {
        let store = InMemoryStore::new();
        let product_id = product_with_stock(&store, 5).await;

        let result = record(
            &store,
            StockMovementInput {
                product_id,
                direction: StockDirection::Exit,
                quantity: 0,
                note: None,
            },
            Uuid::new_v4(),
        )
        .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_rt::test]
    async fn test_record_for_unknown_product() {
        let store = InMemoryStore::new();
        let recorder = user(&store).await;
        let result = record(
            &store,
            StockMovementInput {
                product_id: Uuid::new_v4(),
                direction: StockDirection::Entry,
                quantity: 1,
                note: None,
            },
            recorder,
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn test_record_for_missing_user() {
        let store = InMemoryStore::new();
        let product_id = product_with_stock(&store, 3).await;
        let result = record(
            &store,
            StockMovementInput {
                product_id,
                direction: StockDirection::Exit,
                quantity: 1,
                note: None,
            },
            Uuid::new_v4(),
        )
        .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
        assert_eq!(store.get_product(product_id).await.unwrap().unwrap().quantity_on_hand, 3);
        assert!(list_for_product(&store, product_id).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_list_for_unknown_product() {
        let store = InMemoryStore::new();
        assert!(matches!(
            list_for_product(&store, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}

use shared::{
    domain::{Item, ItemId},
    error::ApiError,
    protocol::{CreateItemRequest, HealthResponse, ItemPatch},
};
use storage::Storage;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn health(ctx: &ApiContext) -> Result<HealthResponse, ApiError> {
    ctx.storage.health_check().await.map_err(internal)?;
    Ok(HealthResponse::healthy())
}

pub async fn list_items(ctx: &ApiContext) -> Result<Vec<Item>, ApiError> {
    ctx.storage.list_items().await.map_err(internal)
}

pub async fn get_item(ctx: &ApiContext, id: ItemId) -> Result<Item, ApiError> {
    ctx.storage
        .get_item(id)
        .await
        .map_err(internal)?
        .ok_or_else(|| item_not_found(id))
}

pub async fn create_item(ctx: &ApiContext, request: CreateItemRequest) -> Result<Item, ApiError> {
    let request = CreateItemRequest {
        title: request.title.trim().to_string(),
        description: request.description,
    };
    request.validate()?;
    ctx.storage.create_item(&request).await.map_err(internal)
}

pub async fn update_item(
    ctx: &ApiContext,
    id: ItemId,
    patch: ItemPatch,
) -> Result<Item, ApiError> {
    let patch = ItemPatch {
        title: patch.title.map(|title| title.trim().to_string()),
        ..patch
    };
    patch.validate()?;
    if patch.is_empty() {
        return get_item(ctx, id).await;
    }
    ctx.storage
        .update_item(id, &patch)
        .await
        .map_err(internal)?
        .ok_or_else(|| item_not_found(id))
}

pub async fn delete_item(ctx: &ApiContext, id: ItemId) -> Result<(), ApiError> {
    if ctx.storage.delete_item(id).await.map_err(internal)? {
        Ok(())
    } else {
        Err(item_not_found(id))
    }
}

fn item_not_found(id: ItemId) -> ApiError {
    ApiError::not_found(format!("item {id} not found"))
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::internal(err.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;

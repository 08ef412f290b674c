//! Item endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidQuery};
use crate::http::server::AppState;
use crate::models::{Connection, Item};

/// Query params for listing items
#[derive(Debug, Default, Deserialize)]
pub struct ItemsParams {
    pub first: Option<u32>,
    pub after: Option<String>,
}

/// Add item request
#[derive(Deserialize)]
pub struct AddItemRequest {
    pub title: String,
    pub content: Option<String>,
}

#[derive(Serialize)]
pub struct RemoveItemResponse {
    pub success: bool,
}

/// GET /items?first=&after= - one page of items in creation order
async fn list_items(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<ItemsParams>,
) -> Result<Json<Connection<Item>>, ApiError> {
    let page = state
        .resolver
        .items(params.first, params.after.as_deref())
        .await?;

    Ok(Json(page))
}

/// POST /items - add an item
async fn add_item(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<AddItemRequest>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let item = state
        .resolver
        .add_item(&req.title, req.content.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /items/{id} - fetch one item
async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    match state.resolver.item(&id).await? {
        Some(item) => Ok(Json(item)),
        None => Err(ApiError::NotFound { resource: "item", id }),
    }
}

/// DELETE /items/{id} - remove an item (idempotent)
async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RemoveItemResponse>, ApiError> {
    let success = state.resolver.remove_item(&id).await?;
    Ok(Json(RemoveItemResponse { success }))
}

/// Item routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/items", get(list_items).post(add_item))
        .route("/items/{id}", get(get_item).delete(remove_item))
}

//! Menu HTTP Handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    AddItemOption, CreateMenuItem, DeleteItemOption, DeleteMenuItem, GetMenuItem, ItemOptionView,
    ListMenu, MenuItemView, SetMenuItemAvailability, UpdateMenuItem,
};
use crate::infrastructure::http::dto::{ApiResponse, Empty, IdRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListMenuRequest {
    pub restaurant_id: Uuid,
    #[serde(default)]
    pub available_only: bool,
}

/// price 以最小货币单位（分）计
#[derive(Debug, Deserialize)]
pub struct CreateMenuItemRequest {
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMenuItemRequest {
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub id: Uuid,
    pub is_available: bool,
}

#[derive(Debug, Deserialize)]
pub struct AddOptionRequest {
    pub item_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub price_delta: i64,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_menu(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListMenuRequest>,
) -> Result<Json<ApiResponse<Vec<MenuItemView>>>, ApiError> {
    let items = state
        .list_menu_handler
        .handle(ListMenu {
            restaurant_id: req.restaurant_id,
            available_only: req.available_only,
        })
        .await?;
    Ok(Json(ApiResponse::success(items)))
}

pub async fn get_menu_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<MenuItemView>>, ApiError> {
    let item = state.get_menu_item_handler.handle(GetMenuItem { item_id: req.id }).await?;
    Ok(Json(ApiResponse::success(item)))
}

pub async fn create_menu_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMenuItemRequest>,
) -> Result<Json<ApiResponse<MenuItemView>>, ApiError> {
    let item = state
        .create_menu_item_handler
        .handle(CreateMenuItem {
            restaurant_id: req.restaurant_id,
            name: req.name,
            description: req.description,
            category: req.category,
            price: req.price,
        })
        .await?;

    tracing::info!(restaurant_id = %item.restaurant_id, item_id = %item.id, "Menu item created");
    Ok(Json(ApiResponse::success(item)))
}

pub async fn update_menu_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateMenuItemRequest>,
) -> Result<Json<ApiResponse<MenuItemView>>, ApiError> {
    let item = state
        .update_menu_item_handler
        .handle(UpdateMenuItem {
            item_id: req.id,
            name: req.name,
            description: req.description,
            category: req.category,
            price: req.price,
        })
        .await?;
    Ok(Json(ApiResponse::success(item)))
}

/// 上架/下架
pub async fn set_menu_item_availability(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AvailabilityRequest>,
) -> Result<Json<ApiResponse<MenuItemView>>, ApiError> {
    let item = state
        .set_availability_handler
        .handle(SetMenuItemAvailability {
            item_id: req.id,
            is_available: req.is_available,
        })
        .await?;

    tracing::info!(item_id = %item.id, is_available = req.is_available, "Menu item availability changed");
    Ok(Json(ApiResponse::success(item)))
}

pub async fn delete_menu_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_menu_item_handler
        .handle(DeleteMenuItem { item_id: req.id })
        .await?;
    Ok(Json(ApiResponse::ok()))
}

pub async fn add_item_option(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddOptionRequest>,
) -> Result<Json<ApiResponse<ItemOptionView>>, ApiError> {
    let option = state
        .add_item_option_handler
        .handle(AddItemOption {
            item_id: req.item_id,
            name: req.name,
            price_delta: req.price_delta,
        })
        .await?;
    Ok(Json(ApiResponse::success(option)))
}

pub async fn delete_item_option(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_item_option_handler
        .handle(DeleteItemOption { option_id: req.id })
        .await?;
    Ok(Json(ApiResponse::ok()))
}

//! Restaurant HTTP Handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    CreateRestaurant, DeleteRestaurant, GetRestaurant, ListRestaurants, RestaurantView,
    UpdateRestaurant,
};
use crate::infrastructure::http::dto::{ApiResponse, Empty, IdRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub description: Option<String>,
}

/// 未提供的字段保持不变
#[derive(Debug, Deserialize)]
pub struct UpdateRestaurantRequest {
    pub id: Uuid,
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_restaurants(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<RestaurantView>>>, ApiError> {
    let restaurants = state.list_restaurants_handler.handle(ListRestaurants).await?;
    Ok(Json(ApiResponse::success(restaurants)))
}

pub async fn get_restaurant(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<RestaurantView>>, ApiError> {
    let restaurant = state
        .get_restaurant_handler
        .handle(GetRestaurant { restaurant_id: req.id })
        .await?;
    Ok(Json(ApiResponse::success(restaurant)))
}

pub async fn create_restaurant(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRestaurantRequest>,
) -> Result<Json<ApiResponse<RestaurantView>>, ApiError> {
    let restaurant = state
        .create_restaurant_handler
        .handle(CreateRestaurant {
            name: req.name,
            address: req.address,
            phone: req.phone,
            description: req.description,
        })
        .await?;

    tracing::info!(restaurant_id = %restaurant.id, name = %restaurant.name, "Restaurant created");
    Ok(Json(ApiResponse::success(restaurant)))
}

pub async fn update_restaurant(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateRestaurantRequest>,
) -> Result<Json<ApiResponse<RestaurantView>>, ApiError> {
    let restaurant = state
        .update_restaurant_handler
        .handle(UpdateRestaurant {
            restaurant_id: req.id,
            name: req.name,
            address: req.address,
            phone: req.phone,
            description: req.description,
        })
        .await?;
    Ok(Json(ApiResponse::success(restaurant)))
}

/// 删除餐厅，连带桌台、菜单、订座与订单
pub async fn delete_restaurant(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_restaurant_handler
        .handle(DeleteRestaurant { restaurant_id: req.id })
        .await?;

    tracing::info!(restaurant_id = %req.id, "Restaurant deleted");
    Ok(Json(ApiResponse::ok()))
}

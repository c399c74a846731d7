//! Table HTTP Handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    CreateTable, DeleteTable, GetTable, ListTables, TableView, UpdateTable,
};
use crate::infrastructure::http::dto::{ApiResponse, Empty, IdRequest, RestaurantScopedRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateTableRequest {
    pub restaurant_id: Uuid,
    pub label: String,
    pub capacity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTableRequest {
    pub id: Uuid,
    pub label: Option<String>,
    pub capacity: Option<i64>,
    pub is_active: Option<bool>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_tables(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RestaurantScopedRequest>,
) -> Result<Json<ApiResponse<Vec<TableView>>>, ApiError> {
    let tables = state
        .list_tables_handler
        .handle(ListTables {
            restaurant_id: req.restaurant_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(tables)))
}

pub async fn get_table(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<TableView>>, ApiError> {
    let table = state.get_table_handler.handle(GetTable { table_id: req.id }).await?;
    Ok(Json(ApiResponse::success(table)))
}

pub async fn create_table(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTableRequest>,
) -> Result<Json<ApiResponse<TableView>>, ApiError> {
    let table = state
        .create_table_handler
        .handle(CreateTable {
            restaurant_id: req.restaurant_id,
            label: req.label,
            capacity: req.capacity,
        })
        .await?;

    tracing::info!(
        restaurant_id = %table.restaurant_id,
        table_id = %table.id,
        label = %table.label,
        "Table created"
    );
    Ok(Json(ApiResponse::success(table)))
}

pub async fn update_table(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateTableRequest>,
) -> Result<Json<ApiResponse<TableView>>, ApiError> {
    let table = state
        .update_table_handler
        .handle(UpdateTable {
            table_id: req.id,
            label: req.label,
            capacity: req.capacity,
            is_active: req.is_active,
        })
        .await?;
    Ok(Json(ApiResponse::success(table)))
}

/// 删除桌台；该桌的订单一并删除，订座只解除关联
pub async fn delete_table(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state.delete_table_handler.handle(DeleteTable { table_id: req.id }).await?;

    tracing::info!(table_id = %req.id, "Table deleted");
    Ok(Json(ApiResponse::ok()))
}

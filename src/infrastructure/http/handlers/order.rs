//! Order HTTP Handlers
//!
//! 提交订单与状态变更成功后，由应用层通过 TableRelay 通知同桌连接

use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    GetOrder, ListOrders, ListTableOrders, OrderView, SubmitOrder, SubmitOrderLine,
    UpdateOrderStatus,
};
use crate::infrastructure::http::dto::{ApiResponse, IdRequest, StatusRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OrderLineRequest {
    pub menu_item_id: Uuid,
    pub quantity: i64,
    #[serde(default)]
    pub option_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitOrderRequest {
    pub restaurant_id: Uuid,
    pub table_id: Uuid,
    pub lines: Vec<OrderLineRequest>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TableOrdersRequest {
    pub restaurant_id: Uuid,
    pub table_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersRequest {
    pub restaurant_id: Uuid,
    pub status: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 公开接口：桌边顾客下单，价格由服务端计算
pub async fn submit_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitOrderRequest>,
) -> Result<Json<ApiResponse<OrderView>>, ApiError> {
    let command = SubmitOrder {
        restaurant_id: req.restaurant_id,
        table_id: req.table_id,
        lines: req
            .lines
            .into_iter()
            .map(|line| SubmitOrderLine {
                menu_item_id: line.menu_item_id,
                quantity: line.quantity,
                option_ids: line.option_ids,
            })
            .collect(),
        note: req.note,
    };

    let order = state.submit_order_handler.handle(command).await?;

    tracing::info!(
        restaurant_id = %order.restaurant_id,
        table_id = %order.table_id,
        order_id = %order.id,
        total = order.total,
        "Order submitted"
    );
    Ok(Json(ApiResponse::success(order)))
}

pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<OrderView>>, ApiError> {
    let order = state.get_order_handler.handle(GetOrder { order_id: req.id }).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// 某一桌的订单，最新的在前
pub async fn list_table_orders(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TableOrdersRequest>,
) -> Result<Json<ApiResponse<Vec<OrderView>>>, ApiError> {
    let orders = state
        .list_table_orders_handler
        .handle(ListTableOrders {
            restaurant_id: req.restaurant_id,
            table_id: req.table_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(orders)))
}

pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListOrdersRequest>,
) -> Result<Json<ApiResponse<Vec<OrderView>>>, ApiError> {
    let orders = state
        .list_orders_handler
        .handle(ListOrders {
            restaurant_id: req.restaurant_id,
            status: req.status,
        })
        .await?;
    Ok(Json(ApiResponse::success(orders)))
}

pub async fn update_order_status(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<ApiResponse<OrderView>>, ApiError> {
    let order = state
        .update_order_status_handler
        .handle(UpdateOrderStatus {
            order_id: req.id,
            status: req.status,
        })
        .await?;

    tracing::info!(order_id = %order.id, status = order.status.as_str(), "Order status changed");
    Ok(Json(ApiResponse::success(order)))
}

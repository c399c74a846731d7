//! Order Query Handlers

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{OrderLineRecord, OrderRecord, OrderRepositoryPort, RestaurantRepositoryPort};
use crate::application::queries::{GetOrder, ListOrders, ListTableOrders};
use crate::domain::order::OrderStatus;

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct OrderLineView {
    pub menu_item_id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub unit_price: i64,
    pub options: Vec<String>,
    pub line_total: i64,
}

impl From<OrderLineRecord> for OrderLineView {
    fn from(record: OrderLineRecord) -> Self {
        Self {
            menu_item_id: record.menu_item_id,
            name: record.name,
            quantity: record.quantity,
            unit_price: record.unit_price,
            options: record.options,
            line_total: record.line_total,
        }
    }
}

/// 订单视图，也是实时通道 `order-update` 中携带的 order 负载
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub table_id: Uuid,
    pub status: OrderStatus,
    pub total: i64,
    pub note: Option<String>,
    pub lines: Vec<OrderLineView>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderView {
    fn from(record: OrderRecord) -> Self {
        Self {
            id: record.id,
            restaurant_id: record.restaurant_id,
            table_id: record.table_id,
            status: record.status,
            total: record.total,
            note: record.note,
            lines: record.lines.into_iter().map(OrderLineView::from).collect(),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetOrder Handler
pub struct GetOrderHandler {
    order_repo: Arc<dyn OrderRepositoryPort>,
}

impl GetOrderHandler {
    pub fn new(order_repo: Arc<dyn OrderRepositoryPort>) -> Self {
        Self { order_repo }
    }

    pub async fn handle(&self, query: GetOrder) -> Result<OrderView, ApplicationError> {
        let order = self
            .order_repo
            .find_by_id(query.order_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Order", query.order_id))?;

        Ok(OrderView::from(order))
    }
}

/// ListOrders Handler
pub struct ListOrdersHandler {
    restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
    order_repo: Arc<dyn OrderRepositoryPort>,
}

impl ListOrdersHandler {
    pub fn new(
        restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
        order_repo: Arc<dyn OrderRepositoryPort>,
    ) -> Self {
        Self {
            restaurant_repo,
            order_repo,
        }
    }

    pub async fn handle(&self, query: ListOrders) -> Result<Vec<OrderView>, ApplicationError> {
        self.restaurant_repo
            .find_by_id(query.restaurant_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Restaurant", query.restaurant_id))?;

        let status = query.status.as_deref().map(OrderStatus::parse).transpose()?;
        let orders = self
            .order_repo
            .find_by_restaurant(query.restaurant_id, status)
            .await?;
        Ok(orders.into_iter().map(OrderView::from).collect())
    }
}

/// ListTableOrders Handler
pub struct ListTableOrdersHandler {
    order_repo: Arc<dyn OrderRepositoryPort>,
}

impl ListTableOrdersHandler {
    pub fn new(order_repo: Arc<dyn OrderRepositoryPort>) -> Self {
        Self { order_repo }
    }

    pub async fn handle(&self, query: ListTableOrders) -> Result<Vec<OrderView>, ApplicationError> {
        let orders = self
            .order_repo
            .find_by_table(query.restaurant_id, query.table_id)
            .await?;
        Ok(orders.into_iter().map(OrderView::from).collect())
    }
}

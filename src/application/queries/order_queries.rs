//! Order Queries

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct GetOrder {
    pub order_id: Uuid,
}

/// 列出餐厅订单（后台）
#[derive(Debug, Clone)]
pub struct ListOrders {
    pub restaurant_id: Uuid,
    pub status: Option<String>,
}

/// 列出某一桌的订单（顾客端）
#[derive(Debug, Clone)]
pub struct ListTableOrders {
    pub restaurant_id: Uuid,
    pub table_id: Uuid,
}

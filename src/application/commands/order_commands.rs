//! Order Commands

use uuid::Uuid;

/// 提交订单中的一行
#[derive(Debug, Clone)]
pub struct SubmitOrderLine {
    pub menu_item_id: Uuid,
    pub quantity: i64,
    pub option_ids: Vec<Uuid>,
}

/// 提交订单命令
#[derive(Debug, Clone)]
pub struct SubmitOrder {
    pub restaurant_id: Uuid,
    pub table_id: Uuid,
    pub lines: Vec<SubmitOrderLine>,
    pub note: Option<String>,
}

/// 变更订单状态命令
#[derive(Debug, Clone)]
pub struct UpdateOrderStatus {
    pub order_id: Uuid,
    pub status: String,
}

//! Table Notifier Port - 桌台实时通知
//!
//! 订单持久化成功后，由应用层通过此端口通知同桌的所有连接。
//! 具体实现为 infrastructure/relay 中的 TableRelay。

use serde_json::Value;

/// Table Notifier Port
pub trait TableNotifierPort: Send + Sync {
    /// 通知新订单（包括提交者在内的全部房间成员）
    ///
    /// 返回成功入队的连接数
    fn notify_order_submitted(&self, restaurant_id: &str, table_id: &str, order: Value) -> usize;

    /// 通知订单状态变更
    fn notify_order_status(&self, restaurant_id: &str, table_id: &str, order: Value) -> usize;
}

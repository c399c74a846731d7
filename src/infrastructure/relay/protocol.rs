//! Relay Wire Protocol
//!
//! 桌台实时通道的帧格式：`{"event": <name>, "data": <payload>}`
//!
//! 客户端 -> 服务端:
//! - `join-table`      `{restaurantId, tableId}`
//! - `leave-table`     `{restaurantId, tableId}`
//! - `cart-update`     `{restaurantId, tableId, ...cart}`
//! - `order-submitted` `{restaurantId, tableId, order}`
//!
//! 服务端 -> 客户端:
//! - `cart-updated`    购物车内容（不含两个 id）
//! - `order-update`    `{type: "new" | "status", order}`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::domain::restaurant::table_room_name;

// ============================================================================
// Identifiers
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    UInt(u64),
}

/// 实时事件中的不透明标识
///
/// JSON 数字会被规范化为十进制字符串，`5` 与 `"5"` 指向同一个房间
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawId", into = "String")]
pub struct RelayId(String);

impl RelayId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<RawId> for RelayId {
    type Error = String;

    fn try_from(raw: RawId) -> Result<Self, Self::Error> {
        let id = match raw {
            RawId::Text(s) => s.trim().to_string(),
            RawId::Int(n) => n.to_string(),
            RawId::UInt(n) => n.to_string(),
        };
        if id.is_empty() {
            return Err("identifier must not be empty".to_string());
        }
        Ok(Self(id))
    }
}

impl From<RelayId> for String {
    fn from(id: RelayId) -> Self {
        id.0
    }
}

impl fmt::Display for RelayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 房间键：(餐厅, 桌台)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomKey {
    pub restaurant_id: RelayId,
    pub table_id: RelayId,
}

impl RoomKey {
    pub fn new(restaurant_id: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            restaurant_id: RelayId::new(restaurant_id),
            table_id: RelayId::new(table_id),
        }
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&table_room_name(&self.restaurant_id, &self.table_id))
    }
}

// ============================================================================
// Client -> Server
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRef {
    pub restaurant_id: RelayId,
    pub table_id: RelayId,
}

impl TableRef {
    pub fn room(self) -> RoomKey {
        RoomKey {
            restaurant_id: self.restaurant_id,
            table_id: self.table_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdatePayload {
    pub restaurant_id: RelayId,
    pub table_id: RelayId,
    /// 除两个 id 外的全部字段原样转发
    #[serde(flatten)]
    pub cart: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmittedPayload {
    pub restaurant_id: RelayId,
    pub table_id: RelayId,
    pub order: Value,
}

/// 客户端事件
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinTable(TableRef),
    LeaveTable(TableRef),
    CartUpdate(CartUpdatePayload),
    OrderSubmitted(OrderSubmittedPayload),
}

// ============================================================================
// Server -> Client
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderUpdateKind {
    New,
    Status,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(rename = "type")]
    pub kind: OrderUpdateKind,
    pub order: Value,
}

/// 服务端事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    CartUpdated(Map<String, Value>),
    OrderUpdate(OrderUpdate),
}

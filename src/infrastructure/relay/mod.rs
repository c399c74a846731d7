//! Realtime Relay
//!
//! 同桌顾客之间的购物车同步与订单推送

mod protocol;
mod table_relay;

pub use protocol::{
    CartUpdatePayload, ClientEvent, OrderSubmittedPayload, OrderUpdate, OrderUpdateKind, RelayId,
    RoomKey, ServerEvent, TableRef,
};
pub use table_relay::{ConnectionId, RelayStats, TableRelay};

//! Table Relay
//!
//! 按 (餐厅, 桌台) 分组 WebSocket 连接，并在组内转发购物车与订单事件。
//!
//! 锁顺序：rooms 先于 connections；join/leave/disconnect 不会同时持有两者。
//! 入队使用 `try_send`，队列已满或已关闭时丢弃事件（仅 debug 日志）。

use dashmap::DashMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use super::protocol::{ClientEvent, OrderUpdate, OrderUpdateKind, RoomKey, ServerEvent};
use crate::application::ports::TableNotifierPort;

pub type ConnectionId = Uuid;

struct Connection {
    tx: mpsc::Sender<ServerEvent>,
    rooms: HashSet<RoomKey>,
}

/// 连接/房间统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelayStats {
    pub connections: usize,
    pub rooms: usize,
    pub memberships: usize,
}

/// 桌台实时中继
pub struct TableRelay {
    /// room -> 成员连接
    rooms: DashMap<RoomKey, HashSet<ConnectionId>>,
    /// connection -> 出站队列 + 已加入的房间
    connections: DashMap<ConnectionId, Connection>,
    outbound_buffer: usize,
}

impl TableRelay {
    pub fn new(outbound_buffer: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            connections: DashMap::new(),
            outbound_buffer: outbound_buffer.max(1),
        }
    }

    /// 注册新连接，返回连接 id 与出站队列接收端
    pub fn register(&self) -> (ConnectionId, mpsc::Receiver<ServerEvent>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(self.outbound_buffer);
        self.connections.insert(
            id,
            Connection {
                tx,
                rooms: HashSet::new(),
            },
        );
        tracing::debug!(connection_id = %id, "Relay connection registered");
        (id, rx)
    }

    /// 加入房间（幂等）
    ///
    /// 返回 true 表示新加入
    pub fn join(&self, id: ConnectionId, key: RoomKey) -> bool {
        {
            let Some(mut conn) = self.connections.get_mut(&id) else {
                tracing::debug!(connection_id = %id, room = %key, "Join from unknown connection ignored");
                return false;
            };
            if !conn.rooms.insert(key.clone()) {
                return false;
            }
        }

        self.rooms.entry(key.clone()).or_default().insert(id);

        // disconnect 可能发生在两步之间
        if !self.connections.contains_key(&id) {
            self.remove_member(&key, id);
            return false;
        }

        tracing::debug!(connection_id = %id, room = %key, "Joined table room");
        true
    }

    /// 离开房间，房间变空时移除
    pub fn leave(&self, id: ConnectionId, key: &RoomKey) -> bool {
        let was_member = match self.connections.get_mut(&id) {
            Some(mut conn) => conn.rooms.remove(key),
            None => false,
        };
        self.remove_member(key, id);
        if was_member {
            tracing::debug!(connection_id = %id, room = %key, "Left table room");
        }
        was_member
    }

    /// 转发购物车更新给房间内除发送者外的所有成员
    pub fn broadcast_cart_update(
        &self,
        sender: ConnectionId,
        key: &RoomKey,
        cart: Map<String, Value>,
    ) -> usize {
        let delivered = self.deliver(key, Some(sender), ServerEvent::CartUpdated(cart));
        tracing::debug!(connection_id = %sender, room = %key, delivered = delivered, "Cart update relayed");
        delivered
    }

    /// 广播新订单给房间内全部成员（包括提交者）
    pub fn broadcast_order_submitted(&self, key: &RoomKey, order: Value) -> usize {
        let event = ServerEvent::OrderUpdate(OrderUpdate {
            kind: OrderUpdateKind::New,
            order,
        });
        let delivered = self.deliver(key, None, event);
        tracing::debug!(room = %key, delivered = delivered, "Order submission relayed");
        delivered
    }

    /// 广播订单状态变更
    pub fn broadcast_order_status(&self, key: &RoomKey, order: Value) -> usize {
        let event = ServerEvent::OrderUpdate(OrderUpdate {
            kind: OrderUpdateKind::Status,
            order,
        });
        let delivered = self.deliver(key, None, event);
        tracing::debug!(room = %key, delivered = delivered, "Order status relayed");
        delivered
    }

    /// 断开连接：从所有房间移除并关闭出站队列
    pub fn disconnect(&self, id: ConnectionId) {
        let Some((_, conn)) = self.connections.remove(&id) else {
            return;
        };
        let joined = conn.rooms.len();
        for key in &conn.rooms {
            self.remove_member(key, id);
        }
        tracing::debug!(connection_id = %id, rooms = joined, "Relay connection closed");
    }

    /// 丢弃全部连接与房间
    pub fn shutdown(&self) {
        let connections = self.connections.len();
        self.rooms.clear();
        self.connections.clear();
        tracing::info!(connections = connections, "Table relay shut down");
    }

    pub fn stats(&self) -> RelayStats {
        RelayStats {
            connections: self.connections.len(),
            rooms: self.rooms.len(),
            memberships: self.rooms.iter().map(|r| r.value().len()).sum(),
        }
    }

    /// 解析并处理一个客户端文本帧，格式错误的帧直接丢弃
    pub fn handle_frame(&self, from: ConnectionId, frame: &str) {
        let event = match serde_json::from_str::<ClientEvent>(frame) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(connection_id = %from, error = %e, "Malformed relay frame dropped");
                return;
            }
        };

        match event {
            ClientEvent::JoinTable(table) => {
                self.join(from, table.room());
            }
            ClientEvent::LeaveTable(table) => {
                self.leave(from, &table.room());
            }
            ClientEvent::CartUpdate(payload) => {
                let key = RoomKey {
                    restaurant_id: payload.restaurant_id,
                    table_id: payload.table_id,
                };
                self.broadcast_cart_update(from, &key, payload.cart);
            }
            ClientEvent::OrderSubmitted(payload) => {
                let key = RoomKey {
                    restaurant_id: payload.restaurant_id,
                    table_id: payload.table_id,
                };
                self.broadcast_order_submitted(&key, payload.order);
            }
        }
    }

    fn remove_member(&self, key: &RoomKey, id: ConnectionId) {
        if let Some(mut members) = self.rooms.get_mut(key) {
            members.remove(&id);
        }
        self.rooms.remove_if(key, |_, members| members.is_empty());
    }

    fn deliver(&self, key: &RoomKey, except: Option<ConnectionId>, event: ServerEvent) -> usize {
        let Some(members) = self.rooms.get(key) else {
            return 0;
        };

        let mut delivered = 0;
        for member in members.iter() {
            if Some(*member) == except {
                continue;
            }
            let Some(conn) = self.connections.get(member) else {
                continue;
            };
            match conn.tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::debug!(connection_id = %member, room = %key, "Outbound queue full, event dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(connection_id = %member, room = %key, "Connection closed, event dropped");
                }
            }
        }
        delivered
    }
}

impl TableNotifierPort for TableRelay {
    fn notify_order_submitted(&self, restaurant_id: &str, table_id: &str, order: Value) -> usize {
        self.broadcast_order_submitted(&RoomKey::new(restaurant_id, table_id), order)
    }

    fn notify_order_status(&self, restaurant_id: &str, table_id: &str, order: Value) -> usize {
        self.broadcast_order_status(&RoomKey::new(restaurant_id, table_id), order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn room(restaurant: &str, table: &str) -> RoomKey {
        RoomKey::new(restaurant, table)
    }

    fn drain(rx: &mut mpsc::Receiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn cart(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("cart must be an object"),
        }
    }

    #[test]
    fn test_members_receive_room_events_in_same_order() {
        let relay = TableRelay::new(64);
        let (x, mut x_rx) = relay.register();
        let (y, mut y_rx) = relay.register();
        let (z, mut z_rx) = relay.register();
        for id in [x, y, z] {
            relay.join(id, room("R1", "T5"));
        }

        let mut expected = Vec::new();
        for i in 0..10 {
            let update = cart(json!({"items": [i]}));
            relay.broadcast_cart_update(x, &room("R1", "T5"), update.clone());
            expected.push(ServerEvent::CartUpdated(update));

            let order = json!({"id": i});
            if i % 2 == 0 {
                relay.broadcast_order_submitted(&room("R1", "T5"), order.clone());
                expected.push(ServerEvent::OrderUpdate(OrderUpdate {
                    kind: OrderUpdateKind::New,
                    order,
                }));
            } else {
                relay.broadcast_order_status(&room("R1", "T5"), order.clone());
                expected.push(ServerEvent::OrderUpdate(OrderUpdate {
                    kind: OrderUpdateKind::Status,
                    order,
                }));
            }
        }

        let y_events = drain(&mut y_rx);
        assert_eq!(y_events, expected);
        assert_eq!(drain(&mut z_rx), y_events);

        // 发送者收不到自己的购物车更新，其余事件顺序一致
        let without_own_carts: Vec<_> = expected
            .into_iter()
            .filter(|e| !matches!(e, ServerEvent::CartUpdated(_)))
            .collect();
        assert_eq!(drain(&mut x_rx), without_own_carts);
    }

    #[test]
    fn test_cart_update_skips_sender() {
        let relay = TableRelay::new(8);
        let (x, mut x_rx) = relay.register();
        let (y, mut y_rx) = relay.register();
        relay.join(x, room("R1", "T5"));
        relay.join(y, room("R1", "T5"));

        let delivered = relay.broadcast_cart_update(x, &room("R1", "T5"), cart(json!({"items": ["A"]})));

        assert_eq!(delivered, 1);
        assert!(drain(&mut x_rx).is_empty());
        assert_eq!(
            drain(&mut y_rx),
            vec![ServerEvent::CartUpdated(cart(json!({"items": ["A"]})))]
        );
    }

    #[test]
    fn test_order_submitted_reaches_submitter() {
        let relay = TableRelay::new(8);
        let (x, mut x_rx) = relay.register();
        relay.join(x, room("R1", "T5"));

        relay.handle_frame(
            x,
            r#"{"event":"order-submitted","data":{"restaurantId":"R1","tableId":"T5","order":{"id":42}}}"#,
        );

        let events = drain(&mut x_rx);
        assert_eq!(
            serde_json::to_value(&events[0]).unwrap(),
            json!({"event": "order-update", "data": {"type": "new", "order": {"id": 42}}})
        );
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_order_submitted_reaches_every_member_once() {
        let relay = TableRelay::new(8);
        let mut receivers = Vec::new();
        for _ in 0..3 {
            let (id, rx) = relay.register();
            relay.join(id, room("R1", "T5"));
            receivers.push(rx);
        }

        let delivered = relay.broadcast_order_submitted(&room("R1", "T5"), json!({"id": 1}));

        assert_eq!(delivered, 3);
        for rx in receivers.iter_mut() {
            assert_eq!(drain(rx).len(), 1);
        }
    }

    #[test]
    fn test_double_join_does_not_duplicate_delivery() {
        let relay = TableRelay::new(8);
        let (x, mut x_rx) = relay.register();
        assert!(relay.join(x, room("R1", "T5")));
        assert!(!relay.join(x, room("R1", "T5")));

        relay.broadcast_order_submitted(&room("R1", "T5"), json!({"id": 1}));

        assert_eq!(drain(&mut x_rx).len(), 1);
        assert_eq!(relay.stats().memberships, 1);
    }

    #[test]
    fn test_rooms_are_isolated() {
        let relay = TableRelay::new(8);
        let (x, _x_rx) = relay.register();
        let (z, mut z_rx) = relay.register();
        let (_idle, mut idle_rx) = relay.register();
        relay.join(x, room("R1", "T5"));
        relay.join(z, room("R2", "T1"));

        relay.broadcast_cart_update(x, &room("R1", "T5"), cart(json!({"items": []})));
        relay.broadcast_order_submitted(&room("R1", "T5"), json!({"id": 7}));

        assert!(drain(&mut z_rx).is_empty());
        assert!(drain(&mut idle_rx).is_empty());
    }

    #[test]
    fn test_numeric_table_id_joins_same_room() {
        let relay = TableRelay::new(8);
        let (x, mut x_rx) = relay.register();
        relay.handle_frame(x, r#"{"event":"join-table","data":{"restaurantId":"R1","tableId":5}}"#);

        relay.broadcast_order_submitted(&room("R1", "5"), json!({"id": 1}));

        assert_eq!(drain(&mut x_rx).len(), 1);
    }

    #[test]
    fn test_leave_stops_delivery_for_that_room_only() {
        let relay = TableRelay::new(8);
        let (x, mut x_rx) = relay.register();
        relay.join(x, room("R1", "T5"));
        relay.join(x, room("R1", "T6"));

        assert!(relay.leave(x, &room("R1", "T5")));
        assert!(!relay.leave(x, &room("R1", "T5")));

        relay.broadcast_order_submitted(&room("R1", "T5"), json!({"id": 1}));
        relay.broadcast_order_submitted(&room("R1", "T6"), json!({"id": 2}));

        assert_eq!(drain(&mut x_rx).len(), 1);
        assert_eq!(relay.stats().rooms, 1);
    }

    #[test]
    fn test_disconnect_removes_all_memberships() {
        let relay = TableRelay::new(8);
        let (x, _x_rx) = relay.register();
        let (y, _y_rx) = relay.register();
        relay.join(x, room("R1", "T5"));
        relay.join(x, room("R1", "T6"));
        relay.join(y, room("R1", "T5"));

        relay.disconnect(x);

        assert_eq!(
            relay.stats(),
            RelayStats {
                connections: 1,
                rooms: 1,
                memberships: 1,
            }
        );
        assert_eq!(relay.broadcast_order_submitted(&room("R1", "T6"), json!({})), 0);
    }

    #[test]
    fn test_join_after_disconnect_is_ignored() {
        let relay = TableRelay::new(8);
        let (x, _x_rx) = relay.register();
        relay.disconnect(x);

        assert!(!relay.join(x, room("R1", "T5")));
        assert_eq!(relay.stats().rooms, 0);
    }

    #[test]
    fn test_full_queue_drops_without_affecting_others() {
        let relay = TableRelay::new(1);
        let (a, mut a_rx) = relay.register();
        let (b, mut b_rx) = relay.register();
        relay.join(a, room("R1", "T5"));
        relay.join(b, room("R1", "T5"));

        assert_eq!(relay.broadcast_order_submitted(&room("R1", "T5"), json!({"id": 1})), 2);
        assert_eq!(drain(&mut b_rx).len(), 1);

        assert_eq!(relay.broadcast_order_submitted(&room("R1", "T5"), json!({"id": 2})), 1);

        let a_events = drain(&mut a_rx);
        let b_events = drain(&mut b_rx);
        assert_eq!(a_events.len(), 1);
        assert_eq!(
            b_events,
            vec![ServerEvent::OrderUpdate(OrderUpdate {
                kind: OrderUpdateKind::New,
                order: json!({"id": 2}),
            })]
        );
    }

    #[test]
    fn test_closed_receiver_is_skipped() {
        let relay = TableRelay::new(4);
        let (a, a_rx) = relay.register();
        let (b, mut b_rx) = relay.register();
        relay.join(a, room("R1", "T5"));
        relay.join(b, room("R1", "T5"));
        drop(a_rx);

        assert_eq!(relay.broadcast_order_status(&room("R1", "T5"), json!({"id": 3})), 1);
        assert_eq!(drain(&mut b_rx).len(), 1);
    }

    #[test]
    fn test_malformed_frames_are_dropped() {
        let relay = TableRelay::new(4);
        let (x, mut x_rx) = relay.register();
        relay.join(x, room("R1", "T5"));

        relay.handle_frame(x, "{not json");
        relay.handle_frame(x, r#"{"event":"cart-update","data":{"items":[]}}"#);

        assert!(drain(&mut x_rx).is_empty());
        assert_eq!(relay.stats().memberships, 1);
    }

    #[test]
    fn test_notifier_port_targets_room() {
        let relay = TableRelay::new(4);
        let (x, mut x_rx) = relay.register();
        relay.join(x, room("R1", "T5"));

        let notifier: &dyn TableNotifierPort = &relay;
        assert_eq!(notifier.notify_order_status("R1", "T5", json!({"status": "served"})), 1);

        match drain(&mut x_rx).pop() {
            Some(ServerEvent::OrderUpdate(update)) => assert_eq!(update.kind, OrderUpdateKind::Status),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_shutdown_closes_queues() {
        let relay = TableRelay::new(4);
        let (x, mut x_rx) = relay.register();
        relay.join(x, room("R1", "T5"));

        relay.shutdown();

        assert!(x_rx.recv().await.is_none());
        assert_eq!(relay.stats().connections, 0);
    }
}

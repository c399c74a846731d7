//! Table WebSocket Handler
//!
//! 每个连接两个任务：forward 把出站队列写入 socket，receive 解析客户端帧交给 TableRelay。
//! 任一任务结束即停止另一个，并从所有房间移除该连接。

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::ApplicationError;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TableSocketQuery {
    pub token: Option<String>,
}

/// `/ws/table` 升级
///
/// relay_requires_token 打开时需要 `?token=<jwt>`，否则返回 401
pub async fn table_socket_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<TableSocketQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    if state.relay_requires_token {
        let token = query
            .token
            .as_deref()
            .ok_or_else(|| ApiError::Unauthorized("missing token".to_string()))?;
        let claims = state.token_service.verify(token).map_err(ApplicationError::from)?;
        tracing::debug!(user_id = %claims.user_id, "Relay token accepted");
    }

    Ok(ws
        .on_upgrade(move |socket| handle_table_socket(socket, state))
        .into_response())
}

async fn handle_table_socket(socket: WebSocket, state: Arc<AppState>) {
    let relay = state.relay.clone();
    let (connection_id, mut outbound) = relay.register();
    let (mut sender, mut receiver) = socket.split();

    tracing::info!(connection_id = %connection_id, "Table socket connected");

    // 出站转发，relay.shutdown() 关闭队列后结束
    let mut forward_task = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let msg = match serde_json::to_string(&event) {
                Ok(json) => Message::Text(json),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize relay event");
                    continue;
                }
            };

            if let Err(e) = sender.send(msg).await {
                tracing::debug!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to send WebSocket message"
                );
                break;
            }
        }
        if let Err(e) = sender.close().await {
            tracing::debug!(
                connection_id = %connection_id,
                error = %e,
                "Failed to close WebSocket"
            );
        }
    });

    let relay_for_receive = relay.clone();
    let mut receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => relay_for_receive.handle_frame(connection_id, &text),
                Ok(Message::Binary(_)) => {
                    tracing::debug!(connection_id = %connection_id, "Binary frame ignored");
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!(connection_id = %connection_id, "WebSocket closed by client");
                    break;
                }
                // Ping/Pong 由 axum 处理
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut forward_task => receive_task.abort(),
        _ = &mut receive_task => forward_task.abort(),
    }

    relay.disconnect(connection_id);
    tracing::info!(connection_id = %connection_id, "Table socket disconnected");
}

#[cfg(test)]
mod tests {
    use crate::domain::identity::Role;
    use crate::infrastructure::http::test_support::{issue_token, serve, test_state, test_state_with};
    use futures_util::{SinkExt, StreamExt};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

    type Client = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn send_json(client: &mut Client, value: Value) {
        client.send(WsMessage::Text(value.to_string())).await.unwrap();
    }

    async fn next_json(client: &mut Client) -> Value {
        loop {
            let msg = tokio::time::timeout(Duration::from_secs(5), client.next())
                .await
                .expect("timed out waiting for frame")
                .expect("stream ended")
                .unwrap();
            if let WsMessage::Text(text) = msg {
                return serde_json::from_str(&text).unwrap();
            }
        }
    }

    async fn wait_for_memberships(state: &crate::infrastructure::http::AppState, expected: usize) {
        for _ in 0..100 {
            if state.relay.stats().memberships == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("relay never reached {} memberships", expected);
    }

    #[tokio::test]
    async fn test_cart_update_reaches_other_member_over_socket() {
        let state = test_state().await;
        let addr = serve(state.clone()).await;
        let url = format!("ws://{}/ws/table", addr);

        let (mut x, _) = connect_async(url.as_str()).await.unwrap();
        let (mut y, _) = connect_async(url.as_str()).await.unwrap();

        let join = json!({"event": "join-table", "data": {"restaurantId": "R1", "tableId": "T5"}});
        send_json(&mut x, join.clone()).await;
        send_json(&mut y, join).await;
        wait_for_memberships(&state, 2).await;

        send_json(
            &mut x,
            json!({"event": "cart-update", "data": {"restaurantId": "R1", "tableId": "T5", "items": ["A"]}}),
        )
        .await;

        let frame = next_json(&mut y).await;
        assert_eq!(frame, json!({"event": "cart-updated", "data": {"items": ["A"]}}));

        // 发送者自己收不到
        assert!(tokio::time::timeout(Duration::from_millis(200), x.next()).await.is_err());

        send_json(
            &mut x,
            json!({"event": "order-submitted", "data": {"restaurantId": "R1", "tableId": "T5", "order": {"id": 42}}}),
        )
        .await;
        let expected = json!({"event": "order-update", "data": {"type": "new", "order": {"id": 42}}});
        assert_eq!(next_json(&mut x).await, expected);
        assert_eq!(next_json(&mut y).await, expected);
    }

    #[tokio::test]
    async fn test_closing_socket_leaves_rooms() {
        let state = test_state().await;
        let addr = serve(state.clone()).await;

        let (mut x, _) = connect_async(format!("ws://{}/ws/table", addr)).await.unwrap();
        send_json(
            &mut x,
            json!({"event": "join-table", "data": {"restaurantId": 1, "tableId": 2}}),
        )
        .await;
        wait_for_memberships(&state, 1).await;

        x.close(None).await.unwrap();
        for _ in 0..100 {
            if state.relay.stats().connections == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        let stats = state.relay.stats();
        assert_eq!(stats.connections, 0);
        assert_eq!(stats.rooms, 0);
    }

    #[tokio::test]
    async fn test_token_required_when_enabled() {
        let state = test_state_with(true).await;
        let addr = serve(state.clone()).await;

        assert!(connect_async(format!("ws://{}/ws/table", addr)).await.is_err());
        assert!(connect_async(format!("ws://{}/ws/table?token=forged", addr))
            .await
            .is_err());

        let token = issue_token(&state, Role::Customer).await;
        let (mut client, _) = connect_async(format!("ws://{}/ws/table?token={}", addr, token))
            .await
            .unwrap();
        client.close(None).await.unwrap();
    }
}

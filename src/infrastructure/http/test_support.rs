//! 测试辅助：内存 SQLite 上的完整 AppState 与 HTTP 调用工具

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::util::ServiceExt;
use uuid::Uuid;

use super::server::{HttpServer, ServerConfig};
use super::state::{AppState, Repositories};
use crate::application::UserRecord;
use crate::domain::identity::Role;
use crate::infrastructure::auth::{Argon2PasswordHasher, JwtTokenService};
use crate::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteMenuRepository, SqliteOrderRepository,
    SqliteReservationRepository, SqliteRestaurantRepository, SqliteTableRepository,
    SqliteUserRepository,
};
use crate::infrastructure::relay::TableRelay;

const TEST_SECRET: &str = "http-test-secret-0123456789";

pub async fn test_state() -> Arc<AppState> {
    test_state_with(false).await
}

pub async fn test_state_with(relay_requires_token: bool) -> Arc<AppState> {
    let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let repos = Repositories {
        restaurants: Arc::new(SqliteRestaurantRepository::new(pool.clone())),
        tables: Arc::new(SqliteTableRepository::new(pool.clone())),
        menu: Arc::new(SqliteMenuRepository::new(pool.clone())),
        reservations: Arc::new(SqliteReservationRepository::new(pool.clone())),
        orders: Arc::new(SqliteOrderRepository::new(pool.clone())),
        users: Arc::new(SqliteUserRepository::new(pool)),
    };

    Arc::new(AppState::new(
        repos,
        Arc::new(JwtTokenService::new(TEST_SECRET, 3600)),
        Arc::new(Argon2PasswordHasher::with_params(8, 1, 1).unwrap()),
        Arc::new(TableRelay::new(16)),
        relay_requires_token,
    ))
}

/// 创建指定角色的用户并返回其令牌
pub async fn issue_token(state: &AppState, role: Role) -> String {
    let user = UserRecord {
        id: Uuid::new_v4(),
        name: format!("{} user", role.as_str()),
        email: format!("{}@example.com", Uuid::new_v4().simple()),
        password_hash: state.password_hasher.hash("password123").unwrap(),
        role,
        created_at: Utc::now(),
    };
    state.repos.users.save(&user).await.unwrap();
    state.token_service.issue(&user).unwrap().token
}

pub fn router(state: Arc<AppState>) -> Router {
    HttpServer::new(ServerConfig::default(), state).build_router()
}

/// 在随机端口上启动服务
pub async fn serve(state: Arc<AppState>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// 发送请求并解析 JSON 响应体
pub async fn call(
    state: &Arc<AppState>,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn post(state: &Arc<AppState>, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    call(state, Method::POST, uri, token, Some(body)).await
}

pub async fn get(state: &Arc<AppState>, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    call(state, Method::GET, uri, token, None).await
}

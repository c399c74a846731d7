//! Relay diagnostics

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::relay::RelayStats;

/// 当前连接数、房间数与成员关系数
pub async fn relay_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<RelayStats>> {
    Json(ApiResponse::success(state.relay.stats()))
}

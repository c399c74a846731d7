//! Auth HTTP Handlers

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::{GetCurrentUser, Login, RegisterUser, SessionView, UserView};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::middleware::AuthUser;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// 注册顾客账号，成功后直接返回令牌
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let session = state
        .register_user_handler
        .handle(RegisterUser {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;

    tracing::info!(user_id = %session.user.id, "User registered");
    Ok(Json(ApiResponse::success(session)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let session = state
        .login_handler
        .handle(Login {
            email: req.email,
            password: req.password,
        })
        .await?;

    tracing::debug!(user_id = %session.user.id, "User logged in");
    Ok(Json(ApiResponse::success(session)))
}

/// 当前用户
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    let view = state
        .current_user_handler
        .handle(GetCurrentUser {
            user_id: user.user_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(view)))
}

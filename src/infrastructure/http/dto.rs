//! Data Transfer Objects
//!
//! 统一响应结构与跨资源共享的请求体；各资源自己的请求体定义在对应 handler 文件中

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

// ============================================================================
// 通用请求
// ============================================================================

/// 按 id 操作单个资源（get / delete）
#[derive(Debug, Deserialize)]
pub struct IdRequest {
    pub id: Uuid,
}

/// 按餐厅列出资源
#[derive(Debug, Deserialize)]
pub struct RestaurantScopedRequest {
    pub restaurant_id: Uuid,
}

/// 变更状态（订座 / 订单）
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub id: Uuid,
    pub status: String,
}

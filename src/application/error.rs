//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::{AuthError, RepositoryError};
use crate::domain::identity::IdentityError;
use crate::domain::order::OrderError;
use crate::domain::reservation::ReservationError;
use crate::domain::restaurant::RestaurantError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: Uuid,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 业务规则违反
    #[error("Business rule violation: {0}")]
    BusinessRuleViolation(String),

    /// 状态无效
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 未认证
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 无权限
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 资源冲突
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建业务规则违反错误
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRuleViolation(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(msg) => Self::Conflict(msg),
            RepositoryError::StaleState(msg) => Self::InvalidState(msg),
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<AuthError> for ApplicationError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Signing(msg) | AuthError::Hashing(msg) => Self::InternalError(msg),
            AuthError::MalformedHash => Self::InternalError(err.to_string()),
            other => Self::Unauthorized(other.to_string()),
        }
    }
}

impl From<RestaurantError> for ApplicationError {
    fn from(err: RestaurantError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<IdentityError> for ApplicationError {
    fn from(err: IdentityError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<OrderError> for ApplicationError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::IllegalTransition { .. } => Self::InvalidState(err.to_string()),
            other => Self::ValidationError(other.to_string()),
        }
    }
}

impl From<ReservationError> for ApplicationError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::IllegalTransition { .. } => Self::InvalidState(err.to_string()),
            ReservationError::TableTooSmall { .. } => Self::BusinessRuleViolation(err.to_string()),
            other => Self::ValidationError(other.to_string()),
        }
    }
}

//! Identity Context - 用户与角色

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("无效的邮箱地址: {0}")]
    InvalidEmail(String),

    #[error("密码长度不能少于 {min} 个字符")]
    PasswordTooShort { min: usize },

    #[error("未知角色: {0}")]
    UnknownRole(String),
}

/// 用户角色
///
/// - admin: 管理餐厅、桌台、菜单
/// - staff: 处理订座与订单状态
/// - customer: 仅访问公开接口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Staff,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Customer => "customer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "staff" => Some(Role::Staff),
            "customer" => Some(Role::Customer),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, IdentityError> {
        Self::from_str(s).ok_or_else(|| IdentityError::UnknownRole(s.to_string()))
    }

    /// 是否满足所需角色
    pub fn satisfies(&self, required: Role) -> bool {
        match required {
            Role::Admin => *self == Role::Admin,
            Role::Staff => matches!(self, Role::Admin | Role::Staff),
            Role::Customer => true,
        }
    }
}

/// 邮箱（统一小写）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> Result<Self, IdentityError> {
        let email = email.into().trim().to_lowercase();
        let valid = match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
            None => false,
        };
        if !valid || email.chars().any(char::is_whitespace) {
            return Err(IdentityError::InvalidEmail(email));
        }
        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn check_password_policy(password: &str) -> Result<(), IdentityError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(IdentityError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

//! Auth Ports - 令牌签发与密码摘要

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::UserRecord;
use crate::domain::identity::Role;

/// 认证错误
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    Expired,

    #[error("Malformed password hash")]
    MalformedHash,

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// 已签发的令牌
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// 令牌中携带的身份信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthClaims {
    pub user_id: Uuid,
    pub name: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Token Service Port
pub trait TokenServicePort: Send + Sync {
    /// 为用户签发令牌
    fn issue(&self, user: &UserRecord) -> Result<IssuedToken, AuthError>;

    /// 校验令牌并解析身份
    fn verify(&self, token: &str) -> Result<AuthClaims, AuthError>;
}

/// Password Hasher Port
pub trait PasswordHasherPort: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    fn verify(&self, password: &str, encoded: &str) -> Result<bool, AuthError>;
}

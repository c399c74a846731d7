//! Auth Adapters
//!
//! TokenServicePort 与 PasswordHasherPort 的具体实现

mod jwt_token_service;
mod password_hasher;

pub use jwt_token_service::JwtTokenService;
pub use password_hasher::Argon2PasswordHasher;

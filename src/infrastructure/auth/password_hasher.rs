//! Argon2id 密码哈希
//!
//! 存储为 PHC 字符串（`$argon2id$v=19$m=..,t=..,p=..$<salt>$<hash>`），
//! 参数随哈希一起保存，校验时按哈希内的参数计算。

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::application::ports::{AuthError, PasswordHasherPort};

pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// 使用 argon2 crate 的默认参数（19 MiB, t=2, p=1）
    pub fn new() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()),
        }
    }

    /// 自定义内存（KiB）、迭代次数与并行度
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, AuthError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn verify(&self, password: &str, encoded: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(encoded).map_err(|_| AuthError::MalformedHash)?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(_) => Err(AuthError::MalformedHash),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_params(8, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_verifies_only_original_password() {
        let hasher = cheap();
        let encoded = hasher.hash("correct horse").unwrap();

        assert!(encoded.starts_with("$argon2id$v=19$m=8,t=1,p=1$"));
        assert!(hasher.verify("correct horse", &encoded).unwrap());
        assert!(!hasher.verify("correct horse ", &encoded).unwrap());
        assert!(!hasher.verify("", &encoded).unwrap());
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let hasher = cheap();
        let a = hasher.hash("password1").unwrap();
        let b = hasher.hash("password1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_params_are_read_from_encoded_hash() {
        let encoded = Argon2PasswordHasher::with_params(16, 2, 1)
            .unwrap()
            .hash("pw-123456")
            .unwrap();
        assert!(cheap().verify("pw-123456", &encoded).unwrap());
    }

    #[test]
    fn test_rejects_invalid_params() {
        assert!(matches!(
            Argon2PasswordHasher::with_params(8, 0, 1),
            Err(AuthError::Hashing(_))
        ));
    }

    #[test]
    fn test_malformed_hash() {
        let hasher = cheap();
        assert!(matches!(hasher.verify("x", "plaintext"), Err(AuthError::MalformedHash)));
        assert!(matches!(
            hasher.verify("x", "sha256$1$salt$abc"),
            Err(AuthError::MalformedHash)
        ));
        assert!(matches!(
            hasher.verify("x", "$argon2id$v=19$m=8,t=1,p=1$!!$abc"),
            Err(AuthError::MalformedHash)
        ));
    }
}

//! HS256 JWT 令牌服务

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{AuthClaims, AuthError, IssuedToken, TokenServicePort, UserRecord};
use crate::domain::identity::Role;

/// 十年
const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 3600;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    name: String,
    role: String,
    iat: u64,
    exp: u64,
}

/// JWT 令牌服务
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl: Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64),
        }
    }
}

impl TokenServicePort for JwtTokenService {
    fn issue(&self, user: &UserRecord) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            role: user.role.as_str().to_string(),
            iat: now.timestamp().max(0) as u64,
            exp: expires_at.timestamp().max(0) as u64,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Result<AuthClaims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            },
        )?;
        let claims = data.claims;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))?;
        let role = Role::from_str(&claims.role)
            .ok_or_else(|| AuthError::InvalidToken(format!("unknown role: {}", claims.role)))?;
        let expires_at = i64::try_from(claims.exp)
            .ok()
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
            .ok_or_else(|| AuthError::InvalidToken("exp out of range".to_string()))?;

        Ok(AuthClaims {
            user_id,
            name: claims.name,
            role,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef-test";

    fn user(role: Role) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            name: "Marco".to_string(),
            email: "marco@example.com".to_string(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let service = JwtTokenService::new(SECRET, 3600);
        let user = user(Role::Staff);

        let issued = service.issue(&user).unwrap();
        let claims = service.verify(&issued.token).unwrap();

        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.name, "Marco");
        assert_eq!(claims.role, Role::Staff);
        assert_eq!(claims.expires_at.timestamp(), issued.expires_at.timestamp());
    }

    #[test]
    fn test_rejects_token_signed_with_other_secret() {
        let issuer = JwtTokenService::new("another-secret-of-16+", 3600);
        let verifier = JwtTokenService::new(SECRET, 3600);

        let issued = issuer.issue(&user(Role::Admin)).unwrap();
        assert!(matches!(
            verifier.verify(&issued.token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_rejects_expired_token() {
        let service = JwtTokenService::new(SECRET, 3600);
        let past = (Utc::now() - Duration::hours(2)).timestamp() as u64;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            name: "Old".to_string(),
            role: "customer".to_string(),
            iat: past - 60,
            exp: past,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(service.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn test_rejects_garbage() {
        let service = JwtTokenService::new(SECRET, 3600);
        assert!(service.verify("not.a.token").is_err());
        assert!(service.verify("").is_err());
    }
}

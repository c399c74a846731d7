//! Auth Command Handlers

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{BootstrapAdmin, Login, RegisterUser};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    PasswordHasherPort, TokenServicePort, UserRecord, UserRepositoryPort,
};
use crate::application::queries::handlers::UserView;
use crate::domain::identity::{check_password_policy, Email, Role};
use crate::domain::restaurant::EntityName;

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// 登录/注册结果
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub token: String,
    pub expires_at: String,
    pub user: UserView,
}

async fn create_user(
    user_repo: &dyn UserRepositoryPort,
    password_hasher: &dyn PasswordHasherPort,
    name: &str,
    email: &Email,
    password: &str,
    role: Role,
) -> Result<UserRecord, ApplicationError> {
    let name = EntityName::new(name)?;
    check_password_policy(password)?;

    let user = UserRecord {
        id: Uuid::new_v4(),
        name: name.into_inner(),
        email: email.as_str().to_string(),
        password_hash: password_hasher.hash(password)?,
        role,
        created_at: Utc::now(),
    };
    user_repo.save(&user).await?;
    Ok(user)
}

// ============================================================================
// RegisterUser
// ============================================================================

/// RegisterUser Handler
///
/// 只创建 customer 账号；staff/admin 由管理员引导流程产生
pub struct RegisterUserHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    password_hasher: Arc<dyn PasswordHasherPort>,
    token_service: Arc<dyn TokenServicePort>,
}

impl RegisterUserHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        password_hasher: Arc<dyn PasswordHasherPort>,
        token_service: Arc<dyn TokenServicePort>,
    ) -> Self {
        Self {
            user_repo,
            password_hasher,
            token_service,
        }
    }

    pub async fn handle(&self, command: RegisterUser) -> Result<SessionView, ApplicationError> {
        let email = Email::new(command.email)?;
        if self.user_repo.find_by_email(email.as_str()).await?.is_some() {
            return Err(ApplicationError::Conflict(format!(
                "email already registered: {}",
                email.as_str()
            )));
        }

        let user = create_user(
            self.user_repo.as_ref(),
            self.password_hasher.as_ref(),
            &command.name,
            &email,
            &command.password,
            Role::Customer,
        )
        .await?;

        let issued = self.token_service.issue(&user)?;
        tracing::info!(user_id = %user.id, "User registered");

        Ok(SessionView {
            token: issued.token,
            expires_at: issued.expires_at.to_rfc3339(),
            user: UserView::from(user),
        })
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login Handler
pub struct LoginHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    password_hasher: Arc<dyn PasswordHasherPort>,
    token_service: Arc<dyn TokenServicePort>,
}

impl LoginHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        password_hasher: Arc<dyn PasswordHasherPort>,
        token_service: Arc<dyn TokenServicePort>,
    ) -> Self {
        Self {
            user_repo,
            password_hasher,
            token_service,
        }
    }

    pub async fn handle(&self, command: Login) -> Result<SessionView, ApplicationError> {
        // 格式错误的邮箱与未知邮箱同样处理，不泄露账号是否存在
        let user = match Email::new(command.email) {
            Ok(email) => self.user_repo.find_by_email(email.as_str()).await?,
            Err(_) => None,
        };
        let user = user.ok_or_else(|| ApplicationError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !self
            .password_hasher
            .verify(&command.password, &user.password_hash)?
        {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(ApplicationError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let issued = self.token_service.issue(&user)?;
        tracing::info!(user_id = %user.id, role = user.role.as_str(), "User logged in");

        Ok(SessionView {
            token: issued.token,
            expires_at: issued.expires_at.to_rfc3339(),
            user: UserView::from(user),
        })
    }
}

// ============================================================================
// BootstrapAdmin
// ============================================================================

/// BootstrapAdmin Handler
///
/// 返回 true 表示新建了管理员
pub struct BootstrapAdminHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    password_hasher: Arc<dyn PasswordHasherPort>,
}

impl BootstrapAdminHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        password_hasher: Arc<dyn PasswordHasherPort>,
    ) -> Self {
        Self {
            user_repo,
            password_hasher,
        }
    }

    pub async fn handle(&self, command: BootstrapAdmin) -> Result<bool, ApplicationError> {
        let email = Email::new(command.email)?;
        if self.user_repo.find_by_email(email.as_str()).await?.is_some() {
            tracing::debug!(email = email.as_str(), "Admin account already present");
            return Ok(false);
        }

        let user = create_user(
            self.user_repo.as_ref(),
            self.password_hasher.as_ref(),
            &command.name,
            &email,
            &command.password,
            Role::Admin,
        )
        .await?;

        tracing::info!(user_id = %user.id, email = %user.email, "Admin account created");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::auth::{Argon2PasswordHasher, JwtTokenService};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteUserRepository,
    };

    struct Fixture {
        register: RegisterUserHandler,
        login: LoginHandler,
        bootstrap: BootstrapAdminHandler,
        tokens: Arc<JwtTokenService>,
    }

    async fn fixture() -> Fixture {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let users = Arc::new(SqliteUserRepository::new(pool));
        let hasher = Arc::new(Argon2PasswordHasher::with_params(8, 1, 1).unwrap());
        let tokens = Arc::new(JwtTokenService::new("a-test-secret-of-enough-length", 3600));

        Fixture {
            register: RegisterUserHandler::new(users.clone(), hasher.clone(), tokens.clone()),
            login: LoginHandler::new(users.clone(), hasher.clone(), tokens.clone()),
            bootstrap: BootstrapAdminHandler::new(users, hasher),
            tokens,
        }
    }

    fn register_cmd(email: &str) -> RegisterUser {
        RegisterUser {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let f = fixture().await;

        let registered = f.register.handle(register_cmd("Ana@Example.com")).await.unwrap();
        assert_eq!(registered.user.email, "ana@example.com");
        assert_eq!(registered.user.role, Role::Customer);

        let session = f
            .login
            .handle(Login {
                email: "ana@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();

        let claims = f.tokens.verify(&session.token).unwrap();
        assert_eq!(claims.user_id, registered.user.id);
        assert_eq!(claims.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let f = fixture().await;
        f.register.handle(register_cmd("dup@example.com")).await.unwrap();

        let result = f.register.handle(register_cmd("DUP@example.com")).await;
        assert!(matches!(result, Err(ApplicationError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let f = fixture().await;
        let mut cmd = register_cmd("short@example.com");
        cmd.password = "abc".to_string();

        let result = f.register.handle(cmd).await;
        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let f = fixture().await;
        f.register.handle(register_cmd("who@example.com")).await.unwrap();

        let wrong_password = f
            .login
            .handle(Login {
                email: "who@example.com".to_string(),
                password: "not the password".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = f
            .login
            .handle(Login {
                email: "nobody@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, ApplicationError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_bootstrap_admin_is_idempotent() {
        let f = fixture().await;
        let cmd = BootstrapAdmin {
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "change-me-now".to_string(),
        };

        assert!(f.bootstrap.handle(cmd.clone()).await.unwrap());
        assert!(!f.bootstrap.handle(cmd).await.unwrap());

        let session = f
            .login
            .handle(Login {
                email: "admin@example.com".to_string(),
                password: "change-me-now".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.user.role, Role::Admin);
    }
}

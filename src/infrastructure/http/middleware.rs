//! HTTP Middleware
//!
//! - 错误日志：4xx/5xx 状态码记录日志
//! - 认证：校验 Bearer 令牌与角色，并把 AuthUser 放入请求扩展

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use super::error::ApiError;
use super::state::AppState;
use crate::application::ApplicationError;
use crate::domain::identity::Role;

/// HTTP 状态码错误日志中间件
///
/// 拦截 HTTP 响应，当状态码为 4xx 或 5xx 时记录日志
/// 注意：业务错误（errno != 0）在 ApiError::into_response() 中记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}

// ============================================================================
// 认证
// ============================================================================

/// 已认证的调用者
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: String,
    pub role: Role,
}

/// 从 `Authorization: Bearer <token>` 中取出令牌
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn authorize(
    state: &AppState,
    mut request: Request,
    next: Next,
    required: Role,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;
    let claims = state
        .token_service
        .verify(token)
        .map_err(ApplicationError::from)?;

    if !claims.role.satisfies(required) {
        tracing::debug!(
            user_id = %claims.user_id,
            role = claims.role.as_str(),
            required = required.as_str(),
            "Role check failed"
        );
        return Err(ApiError::Forbidden(format!("{} role required", required.as_str())));
    }

    request.extensions_mut().insert(AuthUser {
        user_id: claims.user_id,
        name: claims.name,
        role: claims.role,
    });
    Ok(next.run(request).await)
}

/// 任意有效令牌
pub async fn require_user(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, request, next, Role::Customer).await
}

/// staff 或 admin
pub async fn require_staff(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, request, next, Role::Staff).await
}

/// 仅 admin
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, request, next, Role::Admin).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::test_support::{issue_token, test_state};
    use axum::{
        body::Body,
        http::{HeaderValue, Request as HttpRequest, StatusCode},
        routing::get,
        Extension, Router,
    };
    use tower::util::ServiceExt;

    async fn ok_handler() -> &'static str {
        "OK"
    }

    async fn not_found_handler() -> StatusCode {
        StatusCode::NOT_FOUND
    }

    async fn error_handler() -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    async fn whoami(Extension(user): Extension<AuthUser>) -> String {
        user.role.as_str().to_string()
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/ok", get(ok_handler))
            .route("/not-found", get(not_found_handler))
            .route("/error", get(error_handler))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    fn create_auth_router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/staff", get(whoami))
            .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_staff))
            .with_state(state)
    }

    fn get_with_token(uri: &str, token: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_ok_response_no_log() {
        let app = create_test_router();
        let response = app.oneshot(get_with_token("/ok", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_client_error_logs_warning() {
        let app = create_test_router();
        let response = app.oneshot(get_with_token("/not-found", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_server_error_logs_error() {
        let app = create_test_router();
        let response = app.oneshot(get_with_token("/error", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[tokio::test]
    async fn test_role_gate() {
        let state = test_state().await;
        let customer = issue_token(&state, Role::Customer).await;
        let staff = issue_token(&state, Role::Staff).await;
        let admin = issue_token(&state, Role::Admin).await;

        let missing = create_auth_router(state.clone())
            .oneshot(get_with_token("/staff", None))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let forged = create_auth_router(state.clone())
            .oneshot(get_with_token("/staff", Some("not-a-jwt")))
            .await
            .unwrap();
        assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);

        let forbidden = create_auth_router(state.clone())
            .oneshot(get_with_token("/staff", Some(&customer)))
            .await
            .unwrap();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        for token in [staff, admin] {
            let allowed = create_auth_router(state.clone())
                .oneshot(get_with_token("/staff", Some(&token)))
                .await
                .unwrap();
            assert_eq!(allowed.status(), StatusCode::OK);
        }
    }
}

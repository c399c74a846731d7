//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

/// 开发用签名密钥，生产环境必须通过配置覆盖
pub(crate) const DEV_JWT_SECRET: &str = "tavola-dev-secret-change-me";

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 认证配置
    #[serde(default)]
    pub auth: AuthConfig,

    /// 实时中继配置
    #[serde(default)]
    pub relay: RelayConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS 预检缓存时间（秒）
    #[serde(default = "default_cors_max_age")]
    pub cors_max_age_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5080
}

fn default_cors_max_age() -> u64 {
    3600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_max_age_secs: default_cors_max_age(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/tavola.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 认证配置
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 签名密钥，至少 16 字节
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// 令牌有效期（秒）
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,

    /// 启动时创建的管理员
    #[serde(default)]
    pub admin_email: Option<String>,

    #[serde(default)]
    pub admin_password: Option<String>,

    #[serde(default = "default_admin_name")]
    pub admin_name: String,
}

fn default_jwt_secret() -> String {
    DEV_JWT_SECRET.to_string()
}

fn default_token_ttl() -> u64 {
    86400 // 24 小时
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_secs: default_token_ttl(),
            admin_email: None,
            admin_password: None,
            admin_name: default_admin_name(),
        }
    }
}

impl AuthConfig {
    /// 邮箱与密码都配置时返回
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

/// 实时中继配置
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// 每个连接的出站队列容量，满了就丢弃事件
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,

    /// 为 true 时 /ws/table 需要 `?token=`
    #[serde(default)]
    pub require_token: bool,
}

fn default_outbound_buffer() -> usize {
    64
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            outbound_buffer: default_outbound_buffer(),
            require_token: false,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5080);
        assert_eq!(config.database.path, "data/tavola.db");
        assert_eq!(config.auth.token_ttl_secs, 86400);
        assert_eq!(config.relay.outbound_buffer, 64);
        assert!(!config.relay.require_token);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5080");
    }

    #[test]
    fn test_database_url() {
        let config = DatabaseConfig::default();
        assert_eq!(config.database_url(), "sqlite:data/tavola.db?mode=rwc");
    }

    #[test]
    fn test_bootstrap_admin_requires_both_fields() {
        let mut auth = AuthConfig::default();
        assert!(auth.bootstrap_admin().is_none());

        auth.admin_email = Some("root@example.com".to_string());
        assert!(auth.bootstrap_admin().is_none());

        auth.admin_password = Some("changeme123".to_string());
        assert_eq!(auth.bootstrap_admin(), Some(("root@example.com", "changeme123")));
    }
}

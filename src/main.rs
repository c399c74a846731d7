//! Tavola - 餐厅点餐与订座后端
//!
//! - Domain: restaurant/, order/, reservation/, identity/
//! - Application: commands, queries, ports
//! - Infrastructure: http, relay, persistence, auth

use std::sync::Arc;

use tavola::application::{BootstrapAdmin, BootstrapAdminHandler};
use tavola::config::{load_config, print_config};
use tavola::infrastructure::auth::{Argon2PasswordHasher, JwtTokenService};
use tavola::infrastructure::http::{AppState, HttpServer, Repositories, ServerConfig};
use tavola::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteMenuRepository, SqliteOrderRepository,
    SqliteReservationRepository, SqliteRestaurantRepository, SqliteTableRepository,
    SqliteUserRepository,
};
use tavola::infrastructure::relay::TableRelay;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},tavola={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));
    if config.log.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!("Tavola - 餐厅点餐与订座后端");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let repos = Repositories {
        restaurants: Arc::new(SqliteRestaurantRepository::new(pool.clone())),
        tables: Arc::new(SqliteTableRepository::new(pool.clone())),
        menu: Arc::new(SqliteMenuRepository::new(pool.clone())),
        reservations: Arc::new(SqliteReservationRepository::new(pool.clone())),
        orders: Arc::new(SqliteOrderRepository::new(pool.clone())),
        users: Arc::new(SqliteUserRepository::new(pool)),
    };

    // 认证
    let token_service = Arc::new(JwtTokenService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_secs,
    ));
    let password_hasher = Arc::new(Argon2PasswordHasher::new());

    if let Some((email, password)) = config.auth.bootstrap_admin() {
        let created = BootstrapAdminHandler::new(repos.users.clone(), password_hasher.clone())
            .handle(BootstrapAdmin {
                name: config.auth.admin_name.clone(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bootstrap admin: {}", e))?;
        if created {
            tracing::info!(email = %email, "Bootstrap admin created");
        }
    }

    // 实时中继，进程内唯一
    let relay = Arc::new(TableRelay::new(config.relay.outbound_buffer));

    let state = Arc::new(AppState::new(
        repos,
        token_service,
        password_hasher,
        relay.clone(),
        config.relay.require_token,
    ));

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        cors_max_age_secs: config.server.cors_max_age_secs,
    };
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    // 关闭所有出站队列，连接的写任务随之结束
    relay.shutdown();
    tracing::info!("Server shutdown complete");

    Ok(())
}

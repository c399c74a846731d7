//! Tavola - 餐厅点餐与订座后端
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Restaurant Context: 餐厅、桌台、菜单、金额
//! - Order Context: 订单状态机与计价
//! - Reservation Context: 订座状态机
//! - Identity Context: 用户、角色、邮箱与密码规则
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repositories, TokenService, PasswordHasher, TableNotifier）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + `/ws/table` WebSocket
//! - Relay: 按桌分组的实时中继（购物车同步、订单推送）
//! - Persistence: SQLite 存储
//! - Auth: JWT 令牌与密码摘要

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};

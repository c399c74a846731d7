//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::identity::Role;
use crate::domain::order::OrderStatus;
use crate::domain::reservation::ReservationStatus;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 条件更新未命中：行存在但状态已被并发修改
    #[error("Stale state: {0}")]
    StaleState(String),
}

// ============================================================================
// Restaurant Repository
// ============================================================================

/// 餐厅实体（用于持久化）
#[derive(Debug, Clone)]
pub struct RestaurantRecord {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Restaurant Repository Port
#[async_trait]
pub trait RestaurantRepositoryPort: Send + Sync {
    /// 保存餐厅（存在则更新）
    async fn save(&self, restaurant: &RestaurantRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RestaurantRecord>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<RestaurantRecord>, RepositoryError>;

    /// 删除餐厅及其桌台、菜单、订座、订单
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

// ============================================================================
// Table Repository
// ============================================================================

/// 桌台实体
#[derive(Debug, Clone)]
pub struct TableRecord {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub label: String,
    pub capacity: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Table Repository Port
#[async_trait]
pub trait TableRepositoryPort: Send + Sync {
    /// 保存桌台，同一餐厅内 label 重复时返回 Duplicate
    async fn save(&self, table: &TableRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TableRecord>, RepositoryError>;

    async fn find_by_restaurant(&self, restaurant_id: Uuid) -> Result<Vec<TableRecord>, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

// ============================================================================
// Menu Repository
// ============================================================================

/// 菜品实体
#[derive(Debug, Clone)]
pub struct MenuItemRecord {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// 最小货币单位
    pub price: i64,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 菜品选项（如“加辣”“大份”）
#[derive(Debug, Clone)]
pub struct ItemOptionRecord {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub name: String,
    /// 差价，可为负
    pub price_delta: i64,
}

/// Menu Repository Port
#[async_trait]
pub trait MenuRepositoryPort: Send + Sync {
    async fn save_item(&self, item: &MenuItemRecord) -> Result<(), RepositoryError>;

    async fn find_item(&self, id: Uuid) -> Result<Option<MenuItemRecord>, RepositoryError>;

    async fn find_items_by_restaurant(
        &self,
        restaurant_id: Uuid,
        available_only: bool,
    ) -> Result<Vec<MenuItemRecord>, RepositoryError>;

    /// 删除菜品及其选项
    async fn delete_item(&self, id: Uuid) -> Result<(), RepositoryError>;

    async fn save_option(&self, option: &ItemOptionRecord) -> Result<(), RepositoryError>;

    async fn find_option(&self, id: Uuid) -> Result<Option<ItemOptionRecord>, RepositoryError>;

    async fn find_options_by_item(&self, menu_item_id: Uuid) -> Result<Vec<ItemOptionRecord>, RepositoryError>;

    async fn delete_option(&self, id: Uuid) -> Result<(), RepositoryError>;
}

// ============================================================================
// Reservation Repository
// ============================================================================

/// 订座实体
#[derive(Debug, Clone)]
pub struct ReservationRecord {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub table_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub party_size: u32,
    pub reserved_at: DateTime<Utc>,
    pub status: ReservationStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 订座列表过滤条件
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatus>,
    /// 只返回该日（UTC）的订座
    pub day: Option<NaiveDate>,
}

/// Reservation Repository Port
#[async_trait]
pub trait ReservationRepositoryPort: Send + Sync {
    async fn save(&self, reservation: &ReservationRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReservationRecord>, RepositoryError>;

    /// 按预约时间升序返回
    async fn find_by_restaurant(
        &self,
        restaurant_id: Uuid,
        filter: &ReservationFilter,
    ) -> Result<Vec<ReservationRecord>, RepositoryError>;

    /// 仅当当前状态仍为 `from` 时写入 `to`，否则返回 `StaleState`
    async fn update_status(
        &self,
        id: Uuid,
        from: ReservationStatus,
        to: ReservationStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
}

// ============================================================================
// Order Repository
// ============================================================================

/// 订单行
#[derive(Debug, Clone)]
pub struct OrderLineRecord {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    /// 下单时的菜品名快照
    pub name: String,
    pub quantity: u32,
    pub unit_price: i64,
    /// 下单时选中的选项名快照
    pub options: Vec<String>,
    pub line_total: i64,
}

/// 订单实体
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub table_id: Uuid,
    pub status: OrderStatus,
    pub total: i64,
    pub note: Option<String>,
    pub lines: Vec<OrderLineRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order Repository Port
#[async_trait]
pub trait OrderRepositoryPort: Send + Sync {
    /// 在一个事务内写入订单及所有订单行
    async fn create(&self, order: &OrderRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderRecord>, RepositoryError>;

    /// 按创建时间倒序返回
    async fn find_by_restaurant(
        &self,
        restaurant_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderRecord>, RepositoryError>;

    async fn find_by_table(
        &self,
        restaurant_id: Uuid,
        table_id: Uuid,
    ) -> Result<Vec<OrderRecord>, RepositoryError>;

    /// 仅当当前状态仍为 `from` 时写入 `to`，否则返回 `StaleState`
    async fn update_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
}

// ============================================================================
// User Repository
// ============================================================================

/// 用户实体
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// User Repository Port
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    /// 保存用户，邮箱重复时返回 Duplicate
    async fn save(&self, user: &UserRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError>;
}

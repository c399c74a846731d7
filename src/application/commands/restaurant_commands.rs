//! Restaurant / Table Commands

use uuid::Uuid;

/// 创建餐厅命令
#[derive(Debug, Clone)]
pub struct CreateRestaurant {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub description: Option<String>,
}

/// 更新餐厅命令，None 字段保持不变
#[derive(Debug, Clone)]
pub struct UpdateRestaurant {
    pub restaurant_id: Uuid,
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

/// 删除餐厅命令
#[derive(Debug, Clone)]
pub struct DeleteRestaurant {
    pub restaurant_id: Uuid,
}

/// 创建桌台命令
#[derive(Debug, Clone)]
pub struct CreateTable {
    pub restaurant_id: Uuid,
    pub label: String,
    pub capacity: i64,
}

/// 更新桌台命令
#[derive(Debug, Clone)]
pub struct UpdateTable {
    pub table_id: Uuid,
    pub label: Option<String>,
    pub capacity: Option<i64>,
    pub is_active: Option<bool>,
}

/// 删除桌台命令
#[derive(Debug, Clone)]
pub struct DeleteTable {
    pub table_id: Uuid,
}

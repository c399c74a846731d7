//! Restaurant Queries

use uuid::Uuid;

/// 获取餐厅详情查询
#[derive(Debug, Clone)]
pub struct GetRestaurant {
    pub restaurant_id: Uuid,
}

/// 列出所有餐厅查询
#[derive(Debug, Clone)]
pub struct ListRestaurants;

/// 获取桌台详情查询
#[derive(Debug, Clone)]
pub struct GetTable {
    pub table_id: Uuid,
}

/// 列出餐厅桌台查询
#[derive(Debug, Clone)]
pub struct ListTables {
    pub restaurant_id: Uuid,
}

//! Menu Queries

use uuid::Uuid;

/// 获取菜品详情（含选项）
#[derive(Debug, Clone)]
pub struct GetMenuItem {
    pub item_id: Uuid,
}

/// 列出餐厅菜单
#[derive(Debug, Clone)]
pub struct ListMenu {
    pub restaurant_id: Uuid,
    /// 只返回可点的菜品
    pub available_only: bool,
}

//! Menu Commands

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateMenuItem {
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: i64,
}

#[derive(Debug, Clone)]
pub struct UpdateMenuItem {
    pub item_id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<i64>,
}

/// 上架/下架菜品
#[derive(Debug, Clone)]
pub struct SetMenuItemAvailability {
    pub item_id: Uuid,
    pub is_available: bool,
}

#[derive(Debug, Clone)]
pub struct DeleteMenuItem {
    pub item_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct AddItemOption {
    pub item_id: Uuid,
    pub name: String,
    pub price_delta: i64,
}

#[derive(Debug, Clone)]
pub struct DeleteItemOption {
    pub option_id: Uuid,
}

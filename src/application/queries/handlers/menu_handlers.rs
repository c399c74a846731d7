//! Menu Query Handlers

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    ItemOptionRecord, MenuItemRecord, MenuRepositoryPort, RestaurantRepositoryPort,
};
use crate::application::queries::{GetMenuItem, ListMenu};

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ItemOptionView {
    pub id: Uuid,
    pub name: String,
    pub price_delta: i64,
}

impl From<ItemOptionRecord> for ItemOptionView {
    fn from(record: ItemOptionRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            price_delta: record.price_delta,
        }
    }
}

/// 菜品视图（含选项）
#[derive(Debug, Clone, Serialize)]
pub struct MenuItemView {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: i64,
    pub is_available: bool,
    pub options: Vec<ItemOptionView>,
    pub created_at: String,
    pub updated_at: String,
}

impl MenuItemView {
    pub fn new(record: MenuItemRecord, options: Vec<ItemOptionRecord>) -> Self {
        Self {
            id: record.id,
            restaurant_id: record.restaurant_id,
            name: record.name,
            description: record.description,
            category: record.category,
            price: record.price,
            is_available: record.is_available,
            options: options.into_iter().map(ItemOptionView::from).collect(),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// 读取菜品及其选项
pub(crate) async fn load_menu_item_view(
    menu_repo: &dyn MenuRepositoryPort,
    item_id: Uuid,
) -> Result<MenuItemView, ApplicationError> {
    let item = menu_repo
        .find_item(item_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("MenuItem", item_id))?;
    let options = menu_repo.find_options_by_item(item_id).await?;
    Ok(MenuItemView::new(item, options))
}

// ============================================================================
// Handlers
// ============================================================================

/// GetMenuItem Handler
pub struct GetMenuItemHandler {
    menu_repo: Arc<dyn MenuRepositoryPort>,
}

impl GetMenuItemHandler {
    pub fn new(menu_repo: Arc<dyn MenuRepositoryPort>) -> Self {
        Self { menu_repo }
    }

    pub async fn handle(&self, query: GetMenuItem) -> Result<MenuItemView, ApplicationError> {
        load_menu_item_view(self.menu_repo.as_ref(), query.item_id).await
    }
}

/// ListMenu Handler
pub struct ListMenuHandler {
    restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
    menu_repo: Arc<dyn MenuRepositoryPort>,
}

impl ListMenuHandler {
    pub fn new(
        restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
        menu_repo: Arc<dyn MenuRepositoryPort>,
    ) -> Self {
        Self {
            restaurant_repo,
            menu_repo,
        }
    }

    pub async fn handle(&self, query: ListMenu) -> Result<Vec<MenuItemView>, ApplicationError> {
        self.restaurant_repo
            .find_by_id(query.restaurant_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Restaurant", query.restaurant_id))?;

        let items = self
            .menu_repo
            .find_items_by_restaurant(query.restaurant_id, query.available_only)
            .await?;

        let mut views = Vec::with_capacity(items.len());
        for item in items {
            let options = self.menu_repo.find_options_by_item(item.id).await?;
            views.push(MenuItemView::new(item, options));
        }
        Ok(views)
    }
}

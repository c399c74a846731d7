//! Menu Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::non_empty;
use crate::application::commands::{
    AddItemOption, CreateMenuItem, DeleteItemOption, DeleteMenuItem, SetMenuItemAvailability,
    UpdateMenuItem,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ItemOptionRecord, MenuItemRecord, MenuRepositoryPort, RestaurantRepositoryPort,
};
use crate::application::queries::handlers::{load_menu_item_view, ItemOptionView, MenuItemView};
use crate::domain::restaurant::{EntityName, Money};

// ============================================================================
// CreateMenuItem
// ============================================================================

/// CreateMenuItem Handler
pub struct CreateMenuItemHandler {
    restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
    menu_repo: Arc<dyn MenuRepositoryPort>,
}

impl CreateMenuItemHandler {
    pub fn new(
        restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
        menu_repo: Arc<dyn MenuRepositoryPort>,
    ) -> Self {
        Self {
            restaurant_repo,
            menu_repo,
        }
    }

    pub async fn handle(&self, command: CreateMenuItem) -> Result<MenuItemView, ApplicationError> {
        self.restaurant_repo
            .find_by_id(command.restaurant_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Restaurant", command.restaurant_id))?;

        let name = EntityName::new(command.name)?;
        let price = Money::new(command.price)?;
        let now = Utc::now();

        let item = MenuItemRecord {
            id: Uuid::new_v4(),
            restaurant_id: command.restaurant_id,
            name: name.into_inner(),
            description: non_empty(command.description),
            category: non_empty(command.category),
            price: price.minor_units(),
            is_available: true,
            created_at: now,
            updated_at: now,
        };

        self.menu_repo.save_item(&item).await?;

        tracing::info!(
            restaurant_id = %item.restaurant_id,
            item_id = %item.id,
            name = %item.name,
            price = item.price,
            "Menu item created"
        );

        Ok(MenuItemView::new(item, Vec::new()))
    }
}

// ============================================================================
// UpdateMenuItem
// ============================================================================

/// UpdateMenuItem Handler
pub struct UpdateMenuItemHandler {
    menu_repo: Arc<dyn MenuRepositoryPort>,
}

impl UpdateMenuItemHandler {
    pub fn new(menu_repo: Arc<dyn MenuRepositoryPort>) -> Self {
        Self { menu_repo }
    }

    pub async fn handle(&self, command: UpdateMenuItem) -> Result<MenuItemView, ApplicationError> {
        let mut item = self
            .menu_repo
            .find_item(command.item_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("MenuItem", command.item_id))?;

        if let Some(name) = command.name {
            item.name = EntityName::new(name)?.into_inner();
        }
        if command.description.is_some() {
            item.description = non_empty(command.description);
        }
        if command.category.is_some() {
            item.category = non_empty(command.category);
        }
        if let Some(price) = command.price {
            item.price = Money::new(price)?.minor_units();
        }
        item.updated_at = Utc::now();

        self.menu_repo.save_item(&item).await?;

        tracing::info!(item_id = %item.id, "Menu item updated");

        load_menu_item_view(self.menu_repo.as_ref(), item.id).await
    }
}

// ============================================================================
// SetMenuItemAvailability
// ============================================================================

/// SetMenuItemAvailability Handler
pub struct SetMenuItemAvailabilityHandler {
    menu_repo: Arc<dyn MenuRepositoryPort>,
}

impl SetMenuItemAvailabilityHandler {
    pub fn new(menu_repo: Arc<dyn MenuRepositoryPort>) -> Self {
        Self { menu_repo }
    }

    pub async fn handle(&self, command: SetMenuItemAvailability) -> Result<MenuItemView, ApplicationError> {
        let mut item = self
            .menu_repo
            .find_item(command.item_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("MenuItem", command.item_id))?;

        item.is_available = command.is_available;
        item.updated_at = Utc::now();
        self.menu_repo.save_item(&item).await?;

        tracing::info!(
            item_id = %item.id,
            is_available = item.is_available,
            "Menu item availability changed"
        );

        load_menu_item_view(self.menu_repo.as_ref(), item.id).await
    }
}

// ============================================================================
// DeleteMenuItem
// ============================================================================

/// DeleteMenuItem Handler
pub struct DeleteMenuItemHandler {
    menu_repo: Arc<dyn MenuRepositoryPort>,
}

impl DeleteMenuItemHandler {
    pub fn new(menu_repo: Arc<dyn MenuRepositoryPort>) -> Self {
        Self { menu_repo }
    }

    pub async fn handle(&self, command: DeleteMenuItem) -> Result<(), ApplicationError> {
        let item = self
            .menu_repo
            .find_item(command.item_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("MenuItem", command.item_id))?;

        self.menu_repo.delete_item(item.id).await?;

        tracing::info!(item_id = %item.id, name = %item.name, "Menu item deleted");

        Ok(())
    }
}

// ============================================================================
// AddItemOption / DeleteItemOption
// ============================================================================

/// AddItemOption Handler
pub struct AddItemOptionHandler {
    menu_repo: Arc<dyn MenuRepositoryPort>,
}

impl AddItemOptionHandler {
    pub fn new(menu_repo: Arc<dyn MenuRepositoryPort>) -> Self {
        Self { menu_repo }
    }

    pub async fn handle(&self, command: AddItemOption) -> Result<ItemOptionView, ApplicationError> {
        self.menu_repo
            .find_item(command.item_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("MenuItem", command.item_id))?;

        let option = ItemOptionRecord {
            id: Uuid::new_v4(),
            menu_item_id: command.item_id,
            name: EntityName::new(command.name)?.into_inner(),
            price_delta: command.price_delta,
        };

        self.menu_repo.save_option(&option).await?;

        tracing::info!(
            item_id = %option.menu_item_id,
            option_id = %option.id,
            price_delta = option.price_delta,
            "Item option added"
        );

        Ok(ItemOptionView::from(option))
    }
}

/// DeleteItemOption Handler
pub struct DeleteItemOptionHandler {
    menu_repo: Arc<dyn MenuRepositoryPort>,
}

impl DeleteItemOptionHandler {
    pub fn new(menu_repo: Arc<dyn MenuRepositoryPort>) -> Self {
        Self { menu_repo }
    }

    pub async fn handle(&self, command: DeleteItemOption) -> Result<(), ApplicationError> {
        let option = self
            .menu_repo
            .find_option(command.option_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("ItemOption", command.option_id))?;

        self.menu_repo.delete_option(option.id).await?;

        tracing::info!(option_id = %option.id, "Item option deleted");

        Ok(())
    }
}

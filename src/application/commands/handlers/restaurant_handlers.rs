//! Restaurant / Table Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::non_empty;
use crate::application::commands::{
    CreateRestaurant, CreateTable, DeleteRestaurant, DeleteTable, UpdateRestaurant, UpdateTable,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    RestaurantRecord, RestaurantRepositoryPort, TableRecord, TableRepositoryPort,
};
use crate::application::queries::handlers::{RestaurantView, TableView};
use crate::domain::restaurant::{EntityName, SeatCount};

// ============================================================================
// CreateRestaurant
// ============================================================================

/// CreateRestaurant Handler
pub struct CreateRestaurantHandler {
    restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
}

impl CreateRestaurantHandler {
    pub fn new(restaurant_repo: Arc<dyn RestaurantRepositoryPort>) -> Self {
        Self { restaurant_repo }
    }

    pub async fn handle(&self, command: CreateRestaurant) -> Result<RestaurantView, ApplicationError> {
        let name = EntityName::new(command.name)?;
        let address = command.address.trim().to_string();
        if address.is_empty() {
            return Err(ApplicationError::validation("Address cannot be empty"));
        }

        let now = Utc::now();
        let restaurant = RestaurantRecord {
            id: Uuid::new_v4(),
            name: name.into_inner(),
            address,
            phone: non_empty(command.phone),
            description: non_empty(command.description),
            created_at: now,
            updated_at: now,
        };

        self.restaurant_repo.save(&restaurant).await?;

        tracing::info!(
            restaurant_id = %restaurant.id,
            name = %restaurant.name,
            "Restaurant created"
        );

        Ok(RestaurantView::from(restaurant))
    }
}

// ============================================================================
// UpdateRestaurant
// ============================================================================

/// UpdateRestaurant Handler
pub struct UpdateRestaurantHandler {
    restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
}

impl UpdateRestaurantHandler {
    pub fn new(restaurant_repo: Arc<dyn RestaurantRepositoryPort>) -> Self {
        Self { restaurant_repo }
    }

    pub async fn handle(&self, command: UpdateRestaurant) -> Result<RestaurantView, ApplicationError> {
        let mut restaurant = self
            .restaurant_repo
            .find_by_id(command.restaurant_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Restaurant", command.restaurant_id))?;

        if let Some(name) = command.name {
            restaurant.name = EntityName::new(name)?.into_inner();
        }
        if let Some(address) = command.address {
            let address = address.trim().to_string();
            if address.is_empty() {
                return Err(ApplicationError::validation("Address cannot be empty"));
            }
            restaurant.address = address;
        }
        if command.phone.is_some() {
            restaurant.phone = non_empty(command.phone);
        }
        if command.description.is_some() {
            restaurant.description = non_empty(command.description);
        }
        restaurant.updated_at = Utc::now();

        self.restaurant_repo.save(&restaurant).await?;

        tracing::info!(restaurant_id = %restaurant.id, "Restaurant updated");

        Ok(RestaurantView::from(restaurant))
    }
}

// ============================================================================
// DeleteRestaurant
// ============================================================================

/// DeleteRestaurant Handler
pub struct DeleteRestaurantHandler {
    restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
}

impl DeleteRestaurantHandler {
    pub fn new(restaurant_repo: Arc<dyn RestaurantRepositoryPort>) -> Self {
        Self { restaurant_repo }
    }

    pub async fn handle(&self, command: DeleteRestaurant) -> Result<(), ApplicationError> {
        let restaurant = self
            .restaurant_repo
            .find_by_id(command.restaurant_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Restaurant", command.restaurant_id))?;

        self.restaurant_repo.delete(restaurant.id).await?;

        tracing::info!(
            restaurant_id = %restaurant.id,
            name = %restaurant.name,
            "Restaurant deleted"
        );

        Ok(())
    }
}

// ============================================================================
// CreateTable
// ============================================================================

/// CreateTable Handler
pub struct CreateTableHandler {
    restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
    table_repo: Arc<dyn TableRepositoryPort>,
}

impl CreateTableHandler {
    pub fn new(
        restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
        table_repo: Arc<dyn TableRepositoryPort>,
    ) -> Self {
        Self {
            restaurant_repo,
            table_repo,
        }
    }

    pub async fn handle(&self, command: CreateTable) -> Result<TableView, ApplicationError> {
        self.restaurant_repo
            .find_by_id(command.restaurant_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Restaurant", command.restaurant_id))?;

        let label = EntityName::new(command.label)?;
        let capacity = SeatCount::new(command.capacity)?;

        let table = TableRecord {
            id: Uuid::new_v4(),
            restaurant_id: command.restaurant_id,
            label: label.into_inner(),
            capacity: capacity.get(),
            is_active: true,
            created_at: Utc::now(),
        };

        self.table_repo.save(&table).await?;

        tracing::info!(
            restaurant_id = %table.restaurant_id,
            table_id = %table.id,
            label = %table.label,
            "Table created"
        );

        Ok(TableView::from(table))
    }
}

// ============================================================================
// UpdateTable
// ============================================================================

/// UpdateTable Handler
pub struct UpdateTableHandler {
    table_repo: Arc<dyn TableRepositoryPort>,
}

impl UpdateTableHandler {
    pub fn new(table_repo: Arc<dyn TableRepositoryPort>) -> Self {
        Self { table_repo }
    }

    pub async fn handle(&self, command: UpdateTable) -> Result<TableView, ApplicationError> {
        let mut table = self
            .table_repo
            .find_by_id(command.table_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Table", command.table_id))?;

        if let Some(label) = command.label {
            table.label = EntityName::new(label)?.into_inner();
        }
        if let Some(capacity) = command.capacity {
            table.capacity = SeatCount::new(capacity)?.get();
        }
        if let Some(is_active) = command.is_active {
            table.is_active = is_active;
        }

        self.table_repo.save(&table).await?;

        tracing::info!(table_id = %table.id, "Table updated");

        Ok(TableView::from(table))
    }
}

// ============================================================================
// DeleteTable
// ============================================================================

/// DeleteTable Handler
pub struct DeleteTableHandler {
    table_repo: Arc<dyn TableRepositoryPort>,
}

impl DeleteTableHandler {
    pub fn new(table_repo: Arc<dyn TableRepositoryPort>) -> Self {
        Self { table_repo }
    }

    pub async fn handle(&self, command: DeleteTable) -> Result<(), ApplicationError> {
        let table = self
            .table_repo
            .find_by_id(command.table_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Table", command.table_id))?;

        self.table_repo.delete(table.id).await?;

        tracing::info!(table_id = %table.id, label = %table.label, "Table deleted");

        Ok(())
    }
}

//! Restaurant Query Handlers

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    RestaurantRecord, RestaurantRepositoryPort, TableRecord, TableRepositoryPort,
};
use crate::application::queries::{GetRestaurant, GetTable, ListRestaurants, ListTables};
use crate::domain::restaurant::table_room_name;

// ============================================================================
// Response DTOs
// ============================================================================

/// 餐厅视图
#[derive(Debug, Clone, Serialize)]
pub struct RestaurantView {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<RestaurantRecord> for RestaurantView {
    fn from(record: RestaurantRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            address: record.address,
            phone: record.phone,
            description: record.description,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// 桌台视图
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub label: String,
    pub capacity: u32,
    pub is_active: bool,
    /// 实时通道房间名
    pub room: String,
    pub created_at: String,
}

impl From<TableRecord> for TableView {
    fn from(record: TableRecord) -> Self {
        Self {
            room: table_room_name(record.restaurant_id, record.id),
            id: record.id,
            restaurant_id: record.restaurant_id,
            label: record.label,
            capacity: record.capacity,
            is_active: record.is_active,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetRestaurant Handler
pub struct GetRestaurantHandler {
    restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
}

impl GetRestaurantHandler {
    pub fn new(restaurant_repo: Arc<dyn RestaurantRepositoryPort>) -> Self {
        Self { restaurant_repo }
    }

    pub async fn handle(&self, query: GetRestaurant) -> Result<RestaurantView, ApplicationError> {
        let restaurant = self
            .restaurant_repo
            .find_by_id(query.restaurant_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Restaurant", query.restaurant_id))?;

        Ok(RestaurantView::from(restaurant))
    }
}

/// ListRestaurants Handler
pub struct ListRestaurantsHandler {
    restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
}

impl ListRestaurantsHandler {
    pub fn new(restaurant_repo: Arc<dyn RestaurantRepositoryPort>) -> Self {
        Self { restaurant_repo }
    }

    pub async fn handle(&self, _query: ListRestaurants) -> Result<Vec<RestaurantView>, ApplicationError> {
        let restaurants = self.restaurant_repo.find_all().await?;
        Ok(restaurants.into_iter().map(RestaurantView::from).collect())
    }
}

/// GetTable Handler
pub struct GetTableHandler {
    table_repo: Arc<dyn TableRepositoryPort>,
}

impl GetTableHandler {
    pub fn new(table_repo: Arc<dyn TableRepositoryPort>) -> Self {
        Self { table_repo }
    }

    pub async fn handle(&self, query: GetTable) -> Result<TableView, ApplicationError> {
        let table = self
            .table_repo
            .find_by_id(query.table_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Table", query.table_id))?;

        Ok(TableView::from(table))
    }
}

/// ListTables Handler
pub struct ListTablesHandler {
    restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
    table_repo: Arc<dyn TableRepositoryPort>,
}

impl ListTablesHandler {
    pub fn new(
        restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
        table_repo: Arc<dyn TableRepositoryPort>,
    ) -> Self {
        Self {
            restaurant_repo,
            table_repo,
        }
    }

    pub async fn handle(&self, query: ListTables) -> Result<Vec<TableView>, ApplicationError> {
        self.restaurant_repo
            .find_by_id(query.restaurant_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Restaurant", query.restaurant_id))?;

        let tables = self.table_repo.find_by_restaurant(query.restaurant_id).await?;
        Ok(tables.into_iter().map(TableView::from).collect())
    }
}

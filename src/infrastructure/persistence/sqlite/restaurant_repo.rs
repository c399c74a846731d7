//! SQLite Restaurant Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::{format_ts, map_db_err, parse_ts, parse_uuid, DbPool};
use crate::application::ports::{RepositoryError, RestaurantRecord, RestaurantRepositoryPort};

/// SQLite Restaurant Repository
pub struct SqliteRestaurantRepository {
    pool: DbPool,
}

impl SqliteRestaurantRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct RestaurantRow {
    id: String,
    name: String,
    address: String,
    phone: Option<String>,
    description: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<RestaurantRow> for RestaurantRecord {
    type Error = RepositoryError;

    fn try_from(row: RestaurantRow) -> Result<Self, Self::Error> {
        Ok(RestaurantRecord {
            id: parse_uuid(&row.id)?,
            name: row.name,
            address: row.address,
            phone: row.phone,
            description: row.description,
            created_at: parse_ts(&row.created_at)?,
            updated_at: parse_ts(&row.updated_at)?,
        })
    }
}

const SELECT_RESTAURANT: &str =
    "SELECT id, name, address, phone, description, created_at, updated_at FROM restaurants";

#[async_trait]
impl RestaurantRepositoryPort for SqliteRestaurantRepository {
    async fn save(&self, restaurant: &RestaurantRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO restaurants (id, name, address, phone, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                address = excluded.address,
                phone = excluded.phone,
                description = excluded.description,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(restaurant.id.to_string())
        .bind(&restaurant.name)
        .bind(&restaurant.address)
        .bind(&restaurant.phone)
        .bind(&restaurant.description)
        .bind(format_ts(&restaurant.created_at))
        .bind(format_ts(&restaurant.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RestaurantRecord>, RepositoryError> {
        let row: Option<RestaurantRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_RESTAURANT))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.map(RestaurantRecord::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<RestaurantRecord>, RepositoryError> {
        let rows: Vec<RestaurantRow> = sqlx::query_as(&format!("{} ORDER BY name ASC", SELECT_RESTAURANT))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(RestaurantRecord::try_from).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let id = id.to_string();
        // 使用事务确保原子性，按外键依赖从子表到父表删除
        let mut tx = self.pool.begin().await.map_err(map_db_err)?;

        let statements = [
            "DELETE FROM order_lines WHERE order_id IN (SELECT id FROM orders WHERE restaurant_id = ?)",
            "DELETE FROM orders WHERE restaurant_id = ?",
            "DELETE FROM reservations WHERE restaurant_id = ?",
            "DELETE FROM item_options WHERE menu_item_id IN (SELECT id FROM menu_items WHERE restaurant_id = ?)",
            "DELETE FROM menu_items WHERE restaurant_id = ?",
            "DELETE FROM dining_tables WHERE restaurant_id = ?",
        ];
        for statement in statements {
            sqlx::query(statement)
                .bind(&id)
                .execute(&mut *tx)
                .await
                .map_err(map_db_err)?;
        }

        let result = sqlx::query("DELETE FROM restaurants WHERE id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("restaurant {}", id)));
        }

        tx.commit().await.map_err(map_db_err)?;
        Ok(())
    }
}

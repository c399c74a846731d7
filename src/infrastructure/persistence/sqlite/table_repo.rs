//! SQLite Table Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::{format_ts, map_db_err, parse_ts, parse_uuid, to_u32, DbPool};
use crate::application::ports::{RepositoryError, TableRecord, TableRepositoryPort};

/// SQLite Table Repository
pub struct SqliteTableRepository {
    pool: DbPool,
}

impl SqliteTableRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TableRow {
    id: String,
    restaurant_id: String,
    label: String,
    capacity: i64,
    is_active: bool,
    created_at: String,
}

impl TryFrom<TableRow> for TableRecord {
    type Error = RepositoryError;

    fn try_from(row: TableRow) -> Result<Self, Self::Error> {
        Ok(TableRecord {
            id: parse_uuid(&row.id)?,
            restaurant_id: parse_uuid(&row.restaurant_id)?,
            label: row.label,
            capacity: to_u32(row.capacity, "capacity")?,
            is_active: row.is_active,
            created_at: parse_ts(&row.created_at)?,
        })
    }
}

#[async_trait]
impl TableRepositoryPort for SqliteTableRepository {
    async fn save(&self, table: &TableRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO dining_tables (id, restaurant_id, label, capacity, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                label = excluded.label,
                capacity = excluded.capacity,
                is_active = excluded.is_active
            "#,
        )
        .bind(table.id.to_string())
        .bind(table.restaurant_id.to_string())
        .bind(&table.label)
        .bind(i64::from(table.capacity))
        .bind(table.is_active)
        .bind(format_ts(&table.created_at))
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TableRecord>, RepositoryError> {
        let row: Option<TableRow> = sqlx::query_as(
            "SELECT id, restaurant_id, label, capacity, is_active, created_at FROM dining_tables WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(TableRecord::try_from).transpose()
    }

    async fn find_by_restaurant(&self, restaurant_id: Uuid) -> Result<Vec<TableRecord>, RepositoryError> {
        let rows: Vec<TableRow> = sqlx::query_as(
            r#"
            SELECT id, restaurant_id, label, capacity, is_active, created_at
            FROM dining_tables
            WHERE restaurant_id = ?
            ORDER BY label ASC
            "#,
        )
        .bind(restaurant_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        rows.into_iter().map(TableRecord::try_from).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let id = id.to_string();
        let mut tx = self.pool.begin().await.map_err(map_db_err)?;

        // 订座保留，只解除桌台关联
        sqlx::query("UPDATE reservations SET table_id = NULL WHERE table_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_err)?;

        sqlx::query("DELETE FROM order_lines WHERE order_id IN (SELECT id FROM orders WHERE table_id = ?)")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_err)?;

        sqlx::query("DELETE FROM orders WHERE table_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_err)?;

        let result = sqlx::query("DELETE FROM dining_tables WHERE id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("table {}", id)));
        }

        tx.commit().await.map_err(map_db_err)?;
        Ok(())
    }
}

//! SQLite Order Repository
//!
//! 订单与订单行在同一事务中写入；读取时一次性批量加载订单行

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use std::collections::HashMap;
use uuid::Uuid;

use super::{format_ts, map_db_err, parse_ts, parse_uuid, to_u32, DbPool};
use crate::application::ports::{OrderLineRecord, OrderRecord, OrderRepositoryPort, RepositoryError};
use crate::domain::order::OrderStatus;

/// SQLite Order Repository
pub struct SqliteOrderRepository {
    pool: DbPool,
}

impl SqliteOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct OrderRow {
    id: String,
    restaurant_id: String,
    table_id: String,
    status: String,
    total: i64,
    note: Option<String>,
    created_at: String,
    updated_at: String,
}

#[derive(FromRow)]
struct OrderLineRow {
    id: String,
    order_id: String,
    menu_item_id: String,
    name: String,
    quantity: i64,
    unit_price: i64,
    options: String,
    line_total: i64,
}

impl TryFrom<OrderLineRow> for OrderLineRecord {
    type Error = RepositoryError;

    fn try_from(row: OrderLineRow) -> Result<Self, Self::Error> {
        Ok(OrderLineRecord {
            id: parse_uuid(&row.id)?,
            order_id: parse_uuid(&row.order_id)?,
            menu_item_id: parse_uuid(&row.menu_item_id)?,
            name: row.name,
            quantity: to_u32(row.quantity, "quantity")?,
            unit_price: row.unit_price,
            options: serde_json::from_str(&row.options)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            line_total: row.line_total,
        })
    }
}

fn into_record(row: OrderRow, lines: Vec<OrderLineRecord>) -> Result<OrderRecord, RepositoryError> {
    Ok(OrderRecord {
        id: parse_uuid(&row.id)?,
        restaurant_id: parse_uuid(&row.restaurant_id)?,
        table_id: parse_uuid(&row.table_id)?,
        status: OrderStatus::from_str(&row.status).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown order status: {}", row.status))
        })?,
        total: row.total,
        note: row.note,
        lines,
        created_at: parse_ts(&row.created_at)?,
        updated_at: parse_ts(&row.updated_at)?,
    })
}

const SELECT_ORDER: &str =
    "SELECT id, restaurant_id, table_id, status, total, note, created_at, updated_at FROM orders";

impl SqliteOrderRepository {
    /// 为一批订单加载订单行并组装
    async fn attach_lines(&self, rows: Vec<OrderRow>) -> Result<Vec<OrderRecord>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, order_id, menu_item_id, name, quantity, unit_price, options, line_total \
             FROM order_lines WHERE order_id IN (",
        );
        let mut ids = builder.separated(", ");
        for row in &rows {
            ids.push_bind(row.id.clone());
        }
        ids.push_unseparated(") ORDER BY order_id, position");

        let line_rows: Vec<OrderLineRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;

        let mut grouped: HashMap<String, Vec<OrderLineRecord>> = HashMap::new();
        for line in line_rows {
            let key = line.order_id.clone();
            grouped.entry(key).or_default().push(OrderLineRecord::try_from(line)?);
        }

        rows.into_iter()
            .map(|row| {
                let lines = grouped.remove(&row.id).unwrap_or_default();
                into_record(row, lines)
            })
            .collect()
    }
}

#[async_trait]
impl OrderRepositoryPort for SqliteOrderRepository {
    async fn create(&self, order: &OrderRecord) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_db_err)?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, restaurant_id, table_id, status, total, note, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(order.id.to_string())
        .bind(order.restaurant_id.to_string())
        .bind(order.table_id.to_string())
        .bind(order.status.as_str())
        .bind(order.total)
        .bind(&order.note)
        .bind(format_ts(&order.created_at))
        .bind(format_ts(&order.updated_at))
        .execute(&mut *tx)
        .await
        .map_err(map_db_err)?;

        for (position, line) in order.lines.iter().enumerate() {
            let options = serde_json::to_string(&line.options)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

            sqlx::query(
                r#"
                INSERT INTO order_lines (id, order_id, position, menu_item_id, name, quantity, unit_price, options, line_total)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(line.id.to_string())
            .bind(order.id.to_string())
            .bind(position as i64)
            .bind(line.menu_item_id.to_string())
            .bind(&line.name)
            .bind(i64::from(line.quantity))
            .bind(line.unit_price)
            .bind(options)
            .bind(line.line_total)
            .execute(&mut *tx)
            .await
            .map_err(map_db_err)?;
        }

        tx.commit().await.map_err(map_db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderRecord>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_ORDER))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        match row {
            Some(row) => Ok(self.attach_lines(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_restaurant(
        &self,
        restaurant_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderRecord>, RepositoryError> {
        let status = status.map(|s| s.as_str());
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{} WHERE restaurant_id = ? AND (? IS NULL OR status = ?) ORDER BY created_at DESC",
            SELECT_ORDER
        ))
        .bind(restaurant_id.to_string())
        .bind(status)
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        self.attach_lines(rows).await
    }

    async fn find_by_table(
        &self,
        restaurant_id: Uuid,
        table_id: Uuid,
    ) -> Result<Vec<OrderRecord>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{} WHERE restaurant_id = ? AND table_id = ? ORDER BY created_at DESC",
            SELECT_ORDER
        ))
        .bind(restaurant_id.to_string())
        .bind(table_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        self.attach_lines(rows).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(to.as_str())
        .bind(format_ts(&updated_at))
        .bind(id.to_string())
        .bind(from.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        let current: Option<String> = sqlx::query_scalar("SELECT status FROM orders WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        match current {
            None => Err(RepositoryError::NotFound(format!("order {}", id))),
            Some(current) => Err(RepositoryError::StaleState(format!(
                "order {} is {}, expected {}",
                id,
                current,
                from.as_str()
            ))),
        }
    }
}

//! SQLite Menu Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::{format_ts, map_db_err, parse_ts, parse_uuid, DbPool};
use crate::application::ports::{ItemOptionRecord, MenuItemRecord, MenuRepositoryPort, RepositoryError};

/// SQLite Menu Repository
pub struct SqliteMenuRepository {
    pool: DbPool,
}

impl SqliteMenuRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct MenuItemRow {
    id: String,
    restaurant_id: String,
    name: String,
    description: Option<String>,
    category: Option<String>,
    price: i64,
    is_available: bool,
    created_at: String,
    updated_at: String,
}

impl TryFrom<MenuItemRow> for MenuItemRecord {
    type Error = RepositoryError;

    fn try_from(row: MenuItemRow) -> Result<Self, Self::Error> {
        Ok(MenuItemRecord {
            id: parse_uuid(&row.id)?,
            restaurant_id: parse_uuid(&row.restaurant_id)?,
            name: row.name,
            description: row.description,
            category: row.category,
            price: row.price,
            is_available: row.is_available,
            created_at: parse_ts(&row.created_at)?,
            updated_at: parse_ts(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct ItemOptionRow {
    id: String,
    menu_item_id: String,
    name: String,
    price_delta: i64,
}

impl TryFrom<ItemOptionRow> for ItemOptionRecord {
    type Error = RepositoryError;

    fn try_from(row: ItemOptionRow) -> Result<Self, Self::Error> {
        Ok(ItemOptionRecord {
            id: parse_uuid(&row.id)?,
            menu_item_id: parse_uuid(&row.menu_item_id)?,
            name: row.name,
            price_delta: row.price_delta,
        })
    }
}

#[async_trait]
impl MenuRepositoryPort for SqliteMenuRepository {
    async fn save_item(&self, item: &MenuItemRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO menu_items (id, restaurant_id, name, description, category, price, is_available, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                category = excluded.category,
                price = excluded.price,
                is_available = excluded.is_available,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(item.id.to_string())
        .bind(item.restaurant_id.to_string())
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.category)
        .bind(item.price)
        .bind(item.is_available)
        .bind(format_ts(&item.created_at))
        .bind(format_ts(&item.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn find_item(&self, id: Uuid) -> Result<Option<MenuItemRecord>, RepositoryError> {
        let row: Option<MenuItemRow> = sqlx::query_as(
            r#"
            SELECT id, restaurant_id, name, description, category, price, is_available, created_at, updated_at
            FROM menu_items WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(MenuItemRecord::try_from).transpose()
    }

    async fn find_items_by_restaurant(
        &self,
        restaurant_id: Uuid,
        available_only: bool,
    ) -> Result<Vec<MenuItemRecord>, RepositoryError> {
        let rows: Vec<MenuItemRow> = sqlx::query_as(
            r#"
            SELECT id, restaurant_id, name, description, category, price, is_available, created_at, updated_at
            FROM menu_items
            WHERE restaurant_id = ? AND (? = 0 OR is_available = 1)
            ORDER BY COALESCE(category, '') ASC, name ASC
            "#,
        )
        .bind(restaurant_id.to_string())
        .bind(available_only)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        rows.into_iter().map(MenuItemRecord::try_from).collect()
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), RepositoryError> {
        let id = id.to_string();
        let mut tx = self.pool.begin().await.map_err(map_db_err)?;

        sqlx::query("DELETE FROM item_options WHERE menu_item_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_err)?;

        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("menu item {}", id)));
        }

        tx.commit().await.map_err(map_db_err)?;
        Ok(())
    }

    async fn save_option(&self, option: &ItemOptionRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO item_options (id, menu_item_id, name, price_delta)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                price_delta = excluded.price_delta
            "#,
        )
        .bind(option.id.to_string())
        .bind(option.menu_item_id.to_string())
        .bind(&option.name)
        .bind(option.price_delta)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn find_option(&self, id: Uuid) -> Result<Option<ItemOptionRecord>, RepositoryError> {
        let row: Option<ItemOptionRow> =
            sqlx::query_as("SELECT id, menu_item_id, name, price_delta FROM item_options WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_err)?;

        row.map(ItemOptionRecord::try_from).transpose()
    }

    async fn find_options_by_item(&self, menu_item_id: Uuid) -> Result<Vec<ItemOptionRecord>, RepositoryError> {
        let rows: Vec<ItemOptionRow> = sqlx::query_as(
            "SELECT id, menu_item_id, name, price_delta FROM item_options WHERE menu_item_id = ? ORDER BY name ASC",
        )
        .bind(menu_item_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        rows.into_iter().map(ItemOptionRecord::try_from).collect()
    }

    async fn delete_option(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM item_options WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("item option {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{RestaurantRecord, RestaurantRepositoryPort};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteRestaurantRepository,
    };
    use chrono::Utc;

    async fn setup() -> (SqliteMenuRepository, Uuid) {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let restaurant_id = Uuid::new_v4();
        let now = Utc::now();
        SqliteRestaurantRepository::new(pool.clone())
            .save(&RestaurantRecord {
                id: restaurant_id,
                name: "Izakaya".to_string(),
                address: "Alley 3".to_string(),
                phone: None,
                description: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        (SqliteMenuRepository::new(pool), restaurant_id)
    }

    fn item(restaurant_id: Uuid, name: &str, available: bool) -> MenuItemRecord {
        let now = Utc::now();
        MenuItemRecord {
            id: Uuid::new_v4(),
            restaurant_id,
            name: name.to_string(),
            description: None,
            category: Some("mains".to_string()),
            price: 1200,
            is_available: available,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_available_only_filter() {
        let (repo, restaurant_id) = setup().await;
        repo.save_item(&item(restaurant_id, "Ramen", true)).await.unwrap();
        repo.save_item(&item(restaurant_id, "Udon", false)).await.unwrap();

        assert_eq!(repo.find_items_by_restaurant(restaurant_id, false).await.unwrap().len(), 2);
        let available = repo.find_items_by_restaurant(restaurant_id, true).await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "Ramen");
    }

    #[tokio::test]
    async fn test_options_follow_item() {
        let (repo, restaurant_id) = setup().await;
        let ramen = item(restaurant_id, "Ramen", true);
        repo.save_item(&ramen).await.unwrap();

        let egg = ItemOptionRecord {
            id: Uuid::new_v4(),
            menu_item_id: ramen.id,
            name: "Egg".to_string(),
            price_delta: 150,
        };
        repo.save_option(&egg).await.unwrap();
        repo.save_option(&ItemOptionRecord {
            id: Uuid::new_v4(),
            menu_item_id: ramen.id,
            name: "Small".to_string(),
            price_delta: -200,
        })
        .await
        .unwrap();

        let options = repo.find_options_by_item(ramen.id).await.unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[1].price_delta, -200);
        assert_eq!(repo.find_option(egg.id).await.unwrap().unwrap().name, "Egg");

        repo.delete_item(ramen.id).await.unwrap();
        assert!(repo.find_item(ramen.id).await.unwrap().is_none());
        assert!(repo.find_options_by_item(ramen.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_option() {
        let (repo, restaurant_id) = setup().await;
        let ramen = item(restaurant_id, "Ramen", true);
        repo.save_item(&ramen).await.unwrap();
        let option = ItemOptionRecord {
            id: Uuid::new_v4(),
            menu_item_id: ramen.id,
            name: "Spicy".to_string(),
            price_delta: 0,
        };
        repo.save_option(&option).await.unwrap();

        repo.delete_option(option.id).await.unwrap();
        assert!(matches!(
            repo.delete_option(option.id).await,
            Err(RepositoryError::NotFound(_))
        ));
    }
}

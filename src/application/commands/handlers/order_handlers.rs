//! Order Command Handlers
//!
//! 订单先落库，成功后再经 TableNotifierPort 通知同桌连接；
//! 任何校验或持久化失败都不会产生广播。

use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use super::non_empty;
use crate::application::commands::{SubmitOrder, UpdateOrderStatus};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    MenuRepositoryPort, OrderLineRecord, OrderRecord, OrderRepositoryPort, TableNotifierPort,
    TableRepositoryPort,
};
use crate::application::queries::handlers::OrderView;
use crate::domain::order::{price_line, OrderError, OrderStatus, Quantity};
use crate::domain::restaurant::Money;

fn order_payload(view: &OrderView) -> Result<serde_json::Value, ApplicationError> {
    serde_json::to_value(view).map_err(|e| ApplicationError::internal(e.to_string()))
}

// ============================================================================
// SubmitOrder
// ============================================================================

/// SubmitOrder Handler
pub struct SubmitOrderHandler {
    table_repo: Arc<dyn TableRepositoryPort>,
    menu_repo: Arc<dyn MenuRepositoryPort>,
    order_repo: Arc<dyn OrderRepositoryPort>,
    notifier: Arc<dyn TableNotifierPort>,
}

impl SubmitOrderHandler {
    pub fn new(
        table_repo: Arc<dyn TableRepositoryPort>,
        menu_repo: Arc<dyn MenuRepositoryPort>,
        order_repo: Arc<dyn OrderRepositoryPort>,
        notifier: Arc<dyn TableNotifierPort>,
    ) -> Self {
        Self {
            table_repo,
            menu_repo,
            order_repo,
            notifier,
        }
    }

    pub async fn handle(&self, command: SubmitOrder) -> Result<OrderView, ApplicationError> {
        if command.lines.is_empty() {
            return Err(OrderError::EmptyOrder.into());
        }

        let table = self
            .table_repo
            .find_by_id(command.table_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Table", command.table_id))?;
        if table.restaurant_id != command.restaurant_id {
            return Err(ApplicationError::business_rule(
                "Table does not belong to this restaurant",
            ));
        }
        if !table.is_active {
            return Err(ApplicationError::business_rule("Table is not active"));
        }

        let order_id = Uuid::new_v4();
        let mut lines = Vec::with_capacity(command.lines.len());

        for requested in command.lines {
            let quantity = Quantity::new(requested.quantity)?;
            let item = self
                .menu_repo
                .find_item(requested.menu_item_id)
                .await?
                .ok_or_else(|| ApplicationError::not_found("MenuItem", requested.menu_item_id))?;
            if item.restaurant_id != command.restaurant_id {
                return Err(ApplicationError::business_rule(format!(
                    "Menu item {} does not belong to this restaurant",
                    item.id
                )));
            }
            if !item.is_available {
                return Err(ApplicationError::business_rule(format!(
                    "Menu item {} is not available",
                    item.name
                )));
            }

            let available_options = self.menu_repo.find_options_by_item(item.id).await?;
            // 重复的选项只计一次，保留首次出现的顺序
            let mut seen = HashSet::new();
            let mut option_ids = requested.option_ids;
            option_ids.retain(|id| seen.insert(*id));

            let mut option_names = Vec::with_capacity(option_ids.len());
            let mut deltas = Vec::with_capacity(option_ids.len());
            for option_id in option_ids {
                let option = available_options
                    .iter()
                    .find(|o| o.id == option_id)
                    .ok_or_else(|| {
                        ApplicationError::validation(format!(
                            "Option {} does not belong to menu item {}",
                            option_id, item.id
                        ))
                    })?;
                option_names.push(option.name.clone());
                deltas.push(option.price_delta);
            }

            let priced = price_line(Money::new(item.price)?, &deltas, quantity);
            lines.push(OrderLineRecord {
                id: Uuid::new_v4(),
                order_id,
                menu_item_id: item.id,
                name: item.name,
                quantity: quantity.get(),
                unit_price: priced.unit_price.minor_units(),
                options: option_names,
                line_total: priced.line_total.minor_units(),
            });
        }

        let total: Money = lines
            .iter()
            .map(|l| Money::new(l.line_total))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .sum();

        let now = Utc::now();
        let order = OrderRecord {
            id: order_id,
            restaurant_id: command.restaurant_id,
            table_id: command.table_id,
            status: OrderStatus::New,
            total: total.minor_units(),
            note: non_empty(command.note),
            lines,
            created_at: now,
            updated_at: now,
        };

        self.order_repo.create(&order).await?;

        let view = OrderView::from(order);
        let delivered = self.notifier.notify_order_submitted(
            &view.restaurant_id.to_string(),
            &view.table_id.to_string(),
            order_payload(&view)?,
        );

        tracing::info!(
            order_id = %view.id,
            restaurant_id = %view.restaurant_id,
            table_id = %view.table_id,
            total = view.total,
            delivered = delivered,
            "Order submitted"
        );

        Ok(view)
    }
}

// ============================================================================
// UpdateOrderStatus
// ============================================================================

/// UpdateOrderStatus Handler
pub struct UpdateOrderStatusHandler {
    order_repo: Arc<dyn OrderRepositoryPort>,
    notifier: Arc<dyn TableNotifierPort>,
}

impl UpdateOrderStatusHandler {
    pub fn new(order_repo: Arc<dyn OrderRepositoryPort>, notifier: Arc<dyn TableNotifierPort>) -> Self {
        Self {
            order_repo,
            notifier,
        }
    }

    pub async fn handle(&self, command: UpdateOrderStatus) -> Result<OrderView, ApplicationError> {
        let mut order = self
            .order_repo
            .find_by_id(command.order_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Order", command.order_id))?;

        let next = OrderStatus::parse(&command.status)?;
        let previous = order.status;
        order.status = previous.transition(next)?;
        order.updated_at = Utc::now();

        self.order_repo
            .update_status(order.id, previous, order.status, order.updated_at)
            .await?;

        let view = OrderView::from(order);
        let delivered = self.notifier.notify_order_status(
            &view.restaurant_id.to_string(),
            &view.table_id.to_string(),
            order_payload(&view)?,
        );

        tracing::info!(
            order_id = %view.id,
            from = previous.as_str(),
            to = view.status.as_str(),
            delivered = delivered,
            "Order status changed"
        );

        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::SubmitOrderLine;
    use crate::application::ports::{
        ItemOptionRecord, MenuItemRecord, RestaurantRecord, RestaurantRepositoryPort, TableRecord,
    };
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteMenuRepository, SqliteOrderRepository,
        SqliteRestaurantRepository, SqliteTableRepository,
    };
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String, String, serde_json::Value)>>,
    }

    impl TableNotifierPort for RecordingNotifier {
        fn notify_order_submitted(&self, restaurant_id: &str, table_id: &str, order: serde_json::Value) -> usize {
            self.sent.lock().unwrap().push((
                "new".to_string(),
                restaurant_id.to_string(),
                table_id.to_string(),
                order,
            ));
            1
        }

        fn notify_order_status(&self, restaurant_id: &str, table_id: &str, order: serde_json::Value) -> usize {
            self.sent.lock().unwrap().push((
                "status".to_string(),
                restaurant_id.to_string(),
                table_id.to_string(),
                order,
            ));
            1
        }
    }

    struct Fixture {
        submit: SubmitOrderHandler,
        update: UpdateOrderStatusHandler,
        notifier: Arc<RecordingNotifier>,
        menu_repo: Arc<SqliteMenuRepository>,
        restaurant_id: Uuid,
        table_id: Uuid,
        item_id: Uuid,
        option_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let restaurant_repo = Arc::new(SqliteRestaurantRepository::new(pool.clone()));
        let table_repo = Arc::new(SqliteTableRepository::new(pool.clone()));
        let menu_repo = Arc::new(SqliteMenuRepository::new(pool.clone()));
        let order_repo = Arc::new(SqliteOrderRepository::new(pool.clone()));
        let notifier = Arc::new(RecordingNotifier::default());

        let now = Utc::now();
        let restaurant_id = Uuid::new_v4();
        restaurant_repo
            .save(&RestaurantRecord {
                id: restaurant_id,
                name: "Trattoria".to_string(),
                address: "1 Via Roma".to_string(),
                phone: None,
                description: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let table_id = Uuid::new_v4();
        table_repo
            .save(&TableRecord {
                id: table_id,
                restaurant_id,
                label: "T5".to_string(),
                capacity: 4,
                is_active: true,
                created_at: now,
            })
            .await
            .unwrap();

        let item_id = Uuid::new_v4();
        menu_repo
            .save_item(&MenuItemRecord {
                id: item_id,
                restaurant_id,
                name: "Margherita".to_string(),
                description: None,
                category: Some("pizza".to_string()),
                price: 900,
                is_available: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let option_id = Uuid::new_v4();
        menu_repo
            .save_option(&ItemOptionRecord {
                id: option_id,
                menu_item_id: item_id,
                name: "Extra cheese".to_string(),
                price_delta: 150,
            })
            .await
            .unwrap();

        Fixture {
            submit: SubmitOrderHandler::new(
                table_repo.clone(),
                menu_repo.clone(),
                order_repo.clone(),
                notifier.clone(),
            ),
            update: UpdateOrderStatusHandler::new(order_repo, notifier.clone()),
            notifier,
            menu_repo,
            restaurant_id,
            table_id,
            item_id,
            option_id,
        }
    }

    fn one_line(f: &Fixture, quantity: i64, options: Vec<Uuid>) -> SubmitOrder {
        SubmitOrder {
            restaurant_id: f.restaurant_id,
            table_id: f.table_id,
            lines: vec![SubmitOrderLine {
                menu_item_id: f.item_id,
                quantity,
                option_ids: options,
            }],
            note: Some("  no basil ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_submit_prices_and_notifies() {
        let f = fixture().await;

        let view = f.submit.handle(one_line(&f, 2, vec![f.option_id])).await.unwrap();

        assert_eq!(view.status, OrderStatus::New);
        assert_eq!(view.lines[0].unit_price, 1050);
        assert_eq!(view.lines[0].options, vec!["Extra cheese".to_string()]);
        assert_eq!(view.total, 2100);
        assert_eq!(view.note.as_deref(), Some("no basil"));

        let sent = f.notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "new");
        assert_eq!(sent[0].1, f.restaurant_id.to_string());
        assert_eq!(sent[0].2, f.table_id.to_string());
        assert_eq!(sent[0].3["total"], 2100);
    }

    #[tokio::test]
    async fn test_submit_rejects_foreign_option_without_notifying() {
        let f = fixture().await;

        let result = f.submit.handle(one_line(&f, 1, vec![Uuid::new_v4()])).await;

        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
        assert!(f.notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejects_unavailable_item() {
        let f = fixture().await;
        let mut item = f.menu_repo.find_item(f.item_id).await.unwrap().unwrap();
        item.is_available = false;
        f.menu_repo.save_item(&item).await.unwrap();

        let result = f.submit.handle(one_line(&f, 1, vec![])).await;

        assert!(matches!(result, Err(ApplicationError::BusinessRuleViolation(_))));
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_and_bad_quantity() {
        let f = fixture().await;
        let mut empty = one_line(&f, 1, vec![]);
        empty.lines.clear();
        assert!(f.submit.handle(empty).await.is_err());
        assert!(f.submit.handle(one_line(&f, 0, vec![])).await.is_err());
    }

    #[tokio::test]
    async fn test_status_update_follows_state_machine() {
        let f = fixture().await;
        let order = f.submit.handle(one_line(&f, 1, vec![])).await.unwrap();

        let skipped = f
            .update
            .handle(UpdateOrderStatus {
                order_id: order.id,
                status: "paid".to_string(),
            })
            .await;
        assert!(matches!(skipped, Err(ApplicationError::InvalidState(_))));

        let preparing = f
            .update
            .handle(UpdateOrderStatus {
                order_id: order.id,
                status: "preparing".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(preparing.status, OrderStatus::Preparing);

        let sent = f.notifier.sent.lock().unwrap();
        assert_eq!(sent.last().unwrap().0, "status");
        assert_eq!(sent.last().unwrap().3["status"], "preparing");
    }

    #[tokio::test]
    async fn test_submit_counts_repeated_options_once() {
        let f = fixture().await;
        let olives = Uuid::new_v4();
        f.menu_repo
            .save_option(&ItemOptionRecord {
                id: olives,
                menu_item_id: f.item_id,
                name: "Olives".to_string(),
                price_delta: 50,
            })
            .await
            .unwrap();

        let view = f
            .submit
            .handle(one_line(&f, 1, vec![f.option_id, olives, f.option_id]))
            .await
            .unwrap();

        assert_eq!(view.lines[0].unit_price, 1100);
        assert_eq!(
            view.lines[0].options,
            vec!["Extra cheese".to_string(), "Olives".to_string()]
        );
        assert_eq!(view.total, 1100);
    }

    #[tokio::test]
    async fn test_concurrent_status_updates_apply_once() {
        let f = fixture().await;
        let order = f.submit.handle(one_line(&f, 1, vec![])).await.unwrap();
        f.update
            .handle(UpdateOrderStatus {
                order_id: order.id,
                status: "preparing".to_string(),
            })
            .await
            .unwrap();

        let (served, cancelled) = tokio::join!(
            f.update.handle(UpdateOrderStatus {
                order_id: order.id,
                status: "served".to_string(),
            }),
            f.update.handle(UpdateOrderStatus {
                order_id: order.id,
                status: "cancelled".to_string(),
            }),
        );

        let outcomes = [served, cancelled];
        let applied: Vec<_> = outcomes.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(applied.len(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(ApplicationError::InvalidState(_)))));

        let sent = f.notifier.sent.lock().unwrap();
        let status_events: Vec<_> = sent.iter().filter(|e| e.0 == "status").collect();
        // preparing + 唯一成功的那次
        assert_eq!(status_events.len(), 2);
        assert_eq!(status_events[1].3["status"], applied[0].status.as_str());
    }
}

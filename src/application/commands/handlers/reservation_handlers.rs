//! Reservation Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::non_empty;
use crate::application::commands::{CreateReservation, UpdateReservationStatus};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ReservationRecord, ReservationRepositoryPort, RestaurantRepositoryPort, TableRepositoryPort,
};
use crate::application::queries::handlers::ReservationView;
use crate::domain::reservation::{ensure_fits_table, ensure_in_future, ReservationStatus};
use crate::domain::restaurant::{EntityName, SeatCount};

// ============================================================================
// CreateReservation
// ============================================================================

/// CreateReservation Handler
pub struct CreateReservationHandler {
    restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
    table_repo: Arc<dyn TableRepositoryPort>,
    reservation_repo: Arc<dyn ReservationRepositoryPort>,
}

impl CreateReservationHandler {
    pub fn new(
        restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
        table_repo: Arc<dyn TableRepositoryPort>,
        reservation_repo: Arc<dyn ReservationRepositoryPort>,
    ) -> Self {
        Self {
            restaurant_repo,
            table_repo,
            reservation_repo,
        }
    }

    pub async fn handle(&self, command: CreateReservation) -> Result<ReservationView, ApplicationError> {
        self.restaurant_repo
            .find_by_id(command.restaurant_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Restaurant", command.restaurant_id))?;

        let customer_name = EntityName::new(command.customer_name)?;
        let customer_phone = command.customer_phone.trim().to_string();
        if customer_phone.is_empty() {
            return Err(ApplicationError::validation("Customer phone cannot be empty"));
        }
        let party_size = SeatCount::new(command.party_size)?;
        let now = Utc::now();
        ensure_in_future(command.reserved_at, now)?;

        if let Some(table_id) = command.table_id {
            let table = self
                .table_repo
                .find_by_id(table_id)
                .await?
                .ok_or_else(|| ApplicationError::not_found("Table", table_id))?;
            if table.restaurant_id != command.restaurant_id {
                return Err(ApplicationError::business_rule(
                    "Table does not belong to this restaurant",
                ));
            }
            if !table.is_active {
                return Err(ApplicationError::business_rule("Table is not active"));
            }
            ensure_fits_table(SeatCount::new(i64::from(table.capacity))?, party_size)?;
        }

        let reservation = ReservationRecord {
            id: Uuid::new_v4(),
            restaurant_id: command.restaurant_id,
            table_id: command.table_id,
            customer_name: customer_name.into_inner(),
            customer_phone,
            party_size: party_size.get(),
            reserved_at: command.reserved_at,
            status: ReservationStatus::Pending,
            note: non_empty(command.note),
            created_at: now,
            updated_at: now,
        };

        self.reservation_repo.save(&reservation).await?;

        tracing::info!(
            reservation_id = %reservation.id,
            restaurant_id = %reservation.restaurant_id,
            party_size = reservation.party_size,
            reserved_at = %reservation.reserved_at,
            "Reservation created"
        );

        Ok(ReservationView::from(reservation))
    }
}

// ============================================================================
// UpdateReservationStatus
// ============================================================================

/// UpdateReservationStatus Handler
pub struct UpdateReservationStatusHandler {
    reservation_repo: Arc<dyn ReservationRepositoryPort>,
}

impl UpdateReservationStatusHandler {
    pub fn new(reservation_repo: Arc<dyn ReservationRepositoryPort>) -> Self {
        Self { reservation_repo }
    }

    pub async fn handle(&self, command: UpdateReservationStatus) -> Result<ReservationView, ApplicationError> {
        let mut reservation = self
            .reservation_repo
            .find_by_id(command.reservation_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Reservation", command.reservation_id))?;

        let next = ReservationStatus::parse(&command.status)?;
        let previous = reservation.status;
        reservation.status = previous.transition(next)?;
        reservation.updated_at = Utc::now();

        self.reservation_repo
            .update_status(reservation.id, previous, reservation.status, reservation.updated_at)
            .await?;

        tracing::info!(
            reservation_id = %reservation.id,
            from = previous.as_str(),
            to = reservation.status.as_str(),
            "Reservation status changed"
        );

        Ok(ReservationView::from(reservation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::RestaurantRecord;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteReservationRepository,
        SqliteRestaurantRepository, SqliteTableRepository,
    };
    use chrono::Duration;

    struct Fixture {
        create: CreateReservationHandler,
        update: UpdateReservationStatusHandler,
        restaurant_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let restaurant_repo = Arc::new(SqliteRestaurantRepository::new(pool.clone()));
        let table_repo = Arc::new(SqliteTableRepository::new(pool.clone()));
        let reservation_repo = Arc::new(SqliteReservationRepository::new(pool));

        let now = Utc::now();
        let restaurant_id = Uuid::new_v4();
        restaurant_repo
            .save(&RestaurantRecord {
                id: restaurant_id,
                name: "Osteria".to_string(),
                address: "9 Via Po".to_string(),
                phone: None,
                description: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        Fixture {
            create: CreateReservationHandler::new(restaurant_repo, table_repo, reservation_repo.clone()),
            update: UpdateReservationStatusHandler::new(reservation_repo),
            restaurant_id,
        }
    }

    async fn confirmed(f: &Fixture) -> Uuid {
        let created = f
            .create
            .handle(CreateReservation {
                restaurant_id: f.restaurant_id,
                table_id: None,
                customer_name: "Rossi".to_string(),
                customer_phone: "555-0101".to_string(),
                party_size: 2,
                reserved_at: Utc::now() + Duration::days(1),
                note: None,
            })
            .await
            .unwrap();
        assert_eq!(created.status, ReservationStatus::Pending);

        f.update
            .handle(UpdateReservationStatus {
                reservation_id: created.id,
                status: "confirmed".to_string(),
            })
            .await
            .unwrap();
        created.id
    }

    #[tokio::test]
    async fn test_status_update_rejects_illegal_transition() {
        let f = fixture().await;
        let id = confirmed(&f).await;

        let result = f
            .update
            .handle(UpdateReservationStatus {
                reservation_id: id,
                status: "completed".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_concurrent_status_updates_apply_once() {
        let f = fixture().await;
        let id = confirmed(&f).await;

        let (seated, cancelled) = tokio::join!(
            f.update.handle(UpdateReservationStatus {
                reservation_id: id,
                status: "seated".to_string(),
            }),
            f.update.handle(UpdateReservationStatus {
                reservation_id: id,
                status: "cancelled".to_string(),
            }),
        );

        let outcomes = [seated, cancelled];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(ApplicationError::InvalidState(_)))));
    }
}

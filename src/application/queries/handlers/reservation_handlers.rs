//! Reservation Query Handlers

use chrono::SecondsFormat;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    ReservationFilter, ReservationRecord, ReservationRepositoryPort, RestaurantRepositoryPort,
};
use crate::application::queries::{GetReservation, ListReservations};
use crate::domain::reservation::ReservationStatus;

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ReservationView {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub table_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub party_size: u32,
    pub reserved_at: String,
    pub status: ReservationStatus,
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ReservationRecord> for ReservationView {
    fn from(record: ReservationRecord) -> Self {
        Self {
            id: record.id,
            restaurant_id: record.restaurant_id,
            table_id: record.table_id,
            customer_name: record.customer_name,
            customer_phone: record.customer_phone,
            party_size: record.party_size,
            reserved_at: record.reserved_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            status: record.status,
            note: record.note,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetReservation Handler
pub struct GetReservationHandler {
    reservation_repo: Arc<dyn ReservationRepositoryPort>,
}

impl GetReservationHandler {
    pub fn new(reservation_repo: Arc<dyn ReservationRepositoryPort>) -> Self {
        Self { reservation_repo }
    }

    pub async fn handle(&self, query: GetReservation) -> Result<ReservationView, ApplicationError> {
        let reservation = self
            .reservation_repo
            .find_by_id(query.reservation_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Reservation", query.reservation_id))?;

        Ok(ReservationView::from(reservation))
    }
}

/// ListReservations Handler
pub struct ListReservationsHandler {
    restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
    reservation_repo: Arc<dyn ReservationRepositoryPort>,
}

impl ListReservationsHandler {
    pub fn new(
        restaurant_repo: Arc<dyn RestaurantRepositoryPort>,
        reservation_repo: Arc<dyn ReservationRepositoryPort>,
    ) -> Self {
        Self {
            restaurant_repo,
            reservation_repo,
        }
    }

    pub async fn handle(&self, query: ListReservations) -> Result<Vec<ReservationView>, ApplicationError> {
        self.restaurant_repo
            .find_by_id(query.restaurant_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Restaurant", query.restaurant_id))?;

        let status = query
            .status
            .as_deref()
            .map(ReservationStatus::parse)
            .transpose()?;
        let filter = ReservationFilter {
            status,
            day: query.day,
        };

        let reservations = self
            .reservation_repo
            .find_by_restaurant(query.restaurant_id, &filter)
            .await?;
        Ok(reservations.into_iter().map(ReservationView::from).collect())
    }
}

//! Reservation HTTP Handlers

use axum::{extract::State, Json};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    CreateReservation, GetReservation, ListReservations, ReservationView, UpdateReservationStatus,
};
use crate::infrastructure::http::dto::{ApiResponse, IdRequest, StatusRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

/// reserved_at 为 RFC 3339 时间
#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub restaurant_id: Uuid,
    pub table_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub party_size: i64,
    pub reserved_at: DateTime<Utc>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListReservationsRequest {
    pub restaurant_id: Uuid,
    pub status: Option<String>,
    /// YYYY-MM-DD（UTC）
    pub day: Option<NaiveDate>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 公开接口：顾客提交订座
pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<Json<ApiResponse<ReservationView>>, ApiError> {
    let reservation = state
        .create_reservation_handler
        .handle(CreateReservation {
            restaurant_id: req.restaurant_id,
            table_id: req.table_id,
            customer_name: req.customer_name,
            customer_phone: req.customer_phone,
            party_size: req.party_size,
            reserved_at: req.reserved_at,
            note: req.note,
        })
        .await?;

    tracing::info!(
        restaurant_id = %reservation.restaurant_id,
        reservation_id = %reservation.id,
        "Reservation created"
    );
    Ok(Json(ApiResponse::success(reservation)))
}

pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<ReservationView>>, ApiError> {
    let reservation = state
        .get_reservation_handler
        .handle(GetReservation { reservation_id: req.id })
        .await?;
    Ok(Json(ApiResponse::success(reservation)))
}

pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListReservationsRequest>,
) -> Result<Json<ApiResponse<Vec<ReservationView>>>, ApiError> {
    let reservations = state
        .list_reservations_handler
        .handle(ListReservations {
            restaurant_id: req.restaurant_id,
            status: req.status,
            day: req.day,
        })
        .await?;
    Ok(Json(ApiResponse::success(reservations)))
}

pub async fn update_reservation_status(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<ApiResponse<ReservationView>>, ApiError> {
    let reservation = state
        .update_reservation_status_handler
        .handle(UpdateReservationStatus {
            reservation_id: req.id,
            status: req.status,
        })
        .await?;

    tracing::info!(
        reservation_id = %reservation.id,
        status = reservation.status.as_str(),
        "Reservation status changed"
    );
    Ok(Json(ApiResponse::success(reservation)))
}

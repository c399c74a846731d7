//! Reservation Commands

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 创建订座命令
#[derive(Debug, Clone)]
pub struct CreateReservation {
    pub restaurant_id: Uuid,
    pub table_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub party_size: i64,
    pub reserved_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// 变更订座状态命令
#[derive(Debug, Clone)]
pub struct UpdateReservationStatus {
    pub reservation_id: Uuid,
    pub status: String,
}

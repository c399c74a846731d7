//! Reservation Queries

use chrono::NaiveDate;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct GetReservation {
    pub reservation_id: Uuid,
}

/// 列出餐厅订座，可按状态与日期过滤
#[derive(Debug, Clone)]
pub struct ListReservations {
    pub restaurant_id: Uuid,
    pub status: Option<String>,
    pub day: Option<NaiveDate>,
}

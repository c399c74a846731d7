//! Reservation Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReservationError {
    #[error("非法的订座状态: {0}")]
    UnknownStatus(String),

    #[error("订座状态不允许从 {from} 变更为 {to}")]
    IllegalTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("桌台容量 {capacity} 不足以容纳 {party_size} 人")]
    TableTooSmall { capacity: u32, party_size: u32 },

    #[error("订座时间必须晚于当前时间")]
    InThePast,
}

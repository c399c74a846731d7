//! Order Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("订单至少需要一个菜品")]
    EmptyOrder,

    #[error("数量必须在 {min} 到 {max} 之间: {value}")]
    QuantityOutOfRange { value: i64, min: u32, max: u32 },

    #[error("非法的订单状态: {0}")]
    UnknownStatus(String),

    #[error("订单状态不允许从 {from} 变更为 {to}")]
    IllegalTransition {
        from: &'static str,
        to: &'static str,
    },
}

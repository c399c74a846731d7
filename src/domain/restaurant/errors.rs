//! Restaurant Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RestaurantError {
    #[error("名称不能为空")]
    EmptyName,

    #[error("名称长度不能超过 {max} 字符")]
    NameTooLong { max: usize },

    #[error("价格不能为负数: {0}")]
    NegativePrice(i64),

    #[error("座位数必须在 {min} 到 {max} 之间: {value}")]
    SeatCountOutOfRange { value: i64, min: u32, max: u32 },
}

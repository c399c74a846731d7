//! Order Context - 点餐限界上下文
//!
//! 职责:
//! - 订单状态机
//! - 订单行计价（数量 × 最终单价）

mod aggregate;
mod errors;

pub use aggregate::{price_line, OrderStatus, PricedLine, Quantity};
pub use errors::OrderError;

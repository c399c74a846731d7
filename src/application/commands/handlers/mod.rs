//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod auth_handlers;
mod menu_handlers;
mod order_handlers;
mod reservation_handlers;
mod restaurant_handlers;

pub use auth_handlers::*;
pub use menu_handlers::*;
pub use order_handlers::*;
pub use reservation_handlers::*;
pub use restaurant_handlers::*;

/// 去除首尾空白，空字符串视为 None
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//! Query Handlers 实现
//!
//! 所有 QueryHandler 及其响应视图

mod menu_handlers;
mod order_handlers;
mod reservation_handlers;
mod restaurant_handlers;
mod user_handlers;

pub use menu_handlers::*;
pub use order_handlers::*;
pub use reservation_handlers::*;
pub use restaurant_handlers::*;
pub use user_handlers::*;

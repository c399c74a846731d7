//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod menu_queries;
mod order_queries;
mod reservation_queries;
mod restaurant_queries;
mod user_queries;

pub mod handlers;

pub use menu_queries::*;
pub use order_queries::*;
pub use reservation_queries::*;
pub use restaurant_queries::*;
pub use user_queries::*;

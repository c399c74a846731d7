//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod auth_commands;
mod menu_commands;
mod order_commands;
mod reservation_commands;
mod restaurant_commands;

pub mod handlers;

pub use auth_commands::*;
pub use menu_commands::*;
pub use order_commands::*;
pub use reservation_commands::*;
pub use restaurant_commands::*;

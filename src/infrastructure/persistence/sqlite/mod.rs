//! SQLite Persistence - SQLite 数据库持久化实现

mod database;
mod menu_repo;
mod order_repo;
mod reservation_repo;
mod restaurant_repo;
mod table_repo;
mod user_repo;

pub use database::*;
pub use menu_repo::*;
pub use order_repo::*;
pub use reservation_repo::*;
pub use restaurant_repo::*;
pub use table_repo::*;
pub use user_repo::*;

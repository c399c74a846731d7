//! Restaurant Context - 餐厅限界上下文
//!
//! 职责:
//! - 名称、价格、座位数等值对象校验
//! - 菜品最终单价计算（基础价 + 选项差价）

mod errors;
mod value_objects;

pub use errors::RestaurantError;
pub use value_objects::{table_room_name, EntityName, Money, SeatCount};

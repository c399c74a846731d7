//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod auth;
mod repositories;
mod table_notifier;

pub use auth::{AuthClaims, AuthError, IssuedToken, PasswordHasherPort, TokenServicePort};
pub use repositories::{
    ItemOptionRecord, MenuItemRecord, MenuRepositoryPort, OrderLineRecord, OrderRecord,
    OrderRepositoryPort, RepositoryError, ReservationFilter, ReservationRecord,
    ReservationRepositoryPort, RestaurantRecord, RestaurantRepositoryPort, TableRecord,
    TableRepositoryPort, UserRecord, UserRepositoryPort,
};
pub use table_notifier::TableNotifierPort;

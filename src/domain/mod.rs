//! Domain Layer - 领域层
//!
//! 包含四个限界上下文:
//! - Restaurant Context: 餐厅、桌台、菜单
//! - Order Context: 点餐与计价
//! - Reservation Context: 订座
//! - Identity Context: 用户与角色

pub mod identity;
pub mod order;
pub mod reservation;
pub mod restaurant;

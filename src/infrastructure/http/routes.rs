//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                    GET   健康检查
//! - /api/auth/register           POST  注册顾客账号
//! - /api/auth/login              POST  登录
//! - /api/auth/me                 GET   当前用户（需要令牌）
//! - /api/restaurant/{list,get}         公开
//! - /api/restaurant/{create,update,delete}  admin
//! - /api/table/{list,get}              公开
//! - /api/table/{create,update,delete}  admin
//! - /api/menu/{list,get}               公开
//! - /api/menu/{create,update,availability,delete,option/add,option/delete}  admin
//! - /api/reservation/{create,get}      公开
//! - /api/reservation/{list,status}     staff
//! - /api/order/{submit,get,table}      公开
//! - /api/order/{list,status}           staff
//! - /api/relay/stats             GET   staff
//! - /ws/table                    WS    桌台实时中继

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::middleware::{require_admin, require_staff, require_user};
use super::state::AppState;

/// 创建所有路由
///
/// 鉴权中间件需要 state，因此这里传入 state 的引用
pub fn create_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes(state))
        .route("/ws/table", get(handlers::table_socket_handler))
}

/// API 路由
fn api_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/auth", auth_routes(state))
        .nest("/restaurant", restaurant_routes(state))
        .nest("/table", table_routes(state))
        .nest("/menu", menu_routes(state))
        .nest("/reservation", reservation_routes(state))
        .nest("/order", order_routes(state))
        .nest("/relay", relay_routes(state))
}

/// Auth 路由
fn auth_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .merge(protected)
}

/// Restaurant 路由
fn restaurant_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let admin = Router::new()
        .route("/create", post(handlers::create_restaurant))
        .route("/update", post(handlers::update_restaurant))
        .route("/delete", post(handlers::delete_restaurant))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/list", get(handlers::list_restaurants))
        .route("/get", post(handlers::get_restaurant))
        .merge(admin)
}

/// Table 路由
fn table_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let admin = Router::new()
        .route("/create", post(handlers::create_table))
        .route("/update", post(handlers::update_table))
        .route("/delete", post(handlers::delete_table))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/list", post(handlers::list_tables))
        .route("/get", post(handlers::get_table))
        .merge(admin)
}

/// Menu 路由
fn menu_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let admin = Router::new()
        .route("/create", post(handlers::create_menu_item))
        .route("/update", post(handlers::update_menu_item))
        .route("/availability", post(handlers::set_menu_item_availability))
        .route("/delete", post(handlers::delete_menu_item))
        .route("/option/add", post(handlers::add_item_option))
        .route("/option/delete", post(handlers::delete_item_option))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/list", post(handlers::list_menu))
        .route("/get", post(handlers::get_menu_item))
        .merge(admin)
}

/// Reservation 路由
fn reservation_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let staff = Router::new()
        .route("/list", post(handlers::list_reservations))
        .route("/status", post(handlers::update_reservation_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff));

    Router::new()
        .route("/create", post(handlers::create_reservation))
        .route("/get", post(handlers::get_reservation))
        .merge(staff)
}

/// Order 路由
fn order_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let staff = Router::new()
        .route("/list", post(handlers::list_orders))
        .route("/status", post(handlers::update_order_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff));

    Router::new()
        .route("/submit", post(handlers::submit_order))
        .route("/get", post(handlers::get_order))
        .route("/table", post(handlers::list_table_orders))
        .merge(staff)
}

/// Relay 诊断路由
fn relay_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/stats", get(handlers::relay_stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff))
}

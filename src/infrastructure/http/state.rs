//! Application State
//!
//! 持有全部端口实现、实时中继以及 Command/Query Handlers

use std::sync::Arc;

use crate::application::{
    // Command handlers
    AddItemOptionHandler, CreateMenuItemHandler, CreateReservationHandler,
    CreateRestaurantHandler, CreateTableHandler, DeleteItemOptionHandler, DeleteMenuItemHandler,
    DeleteRestaurantHandler, DeleteTableHandler, LoginHandler, RegisterUserHandler,
    SetMenuItemAvailabilityHandler, SubmitOrderHandler, UpdateMenuItemHandler,
    UpdateOrderStatusHandler, UpdateReservationStatusHandler, UpdateRestaurantHandler,
    UpdateTableHandler,
    // Query handlers
    GetCurrentUserHandler, GetMenuItemHandler, GetOrderHandler, GetReservationHandler,
    GetRestaurantHandler, GetTableHandler, ListMenuHandler, ListOrdersHandler,
    ListReservationsHandler, ListRestaurantsHandler, ListTableOrdersHandler, ListTablesHandler,
    // Ports
    MenuRepositoryPort, OrderRepositoryPort, PasswordHasherPort, ReservationRepositoryPort,
    RestaurantRepositoryPort, TableNotifierPort, TableRepositoryPort, TokenServicePort,
    UserRepositoryPort,
};
use crate::infrastructure::relay::TableRelay;

/// 仓储集合
#[derive(Clone)]
pub struct Repositories {
    pub restaurants: Arc<dyn RestaurantRepositoryPort>,
    pub tables: Arc<dyn TableRepositoryPort>,
    pub menu: Arc<dyn MenuRepositoryPort>,
    pub reservations: Arc<dyn ReservationRepositoryPort>,
    pub orders: Arc<dyn OrderRepositoryPort>,
    pub users: Arc<dyn UserRepositoryPort>,
}

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub repos: Repositories,
    pub token_service: Arc<dyn TokenServicePort>,
    pub password_hasher: Arc<dyn PasswordHasherPort>,
    pub relay: Arc<TableRelay>,
    /// 为 true 时 /ws/table 需要携带 token 查询参数
    pub relay_requires_token: bool,

    // ========== Command Handlers ==========
    pub register_user_handler: RegisterUserHandler,
    pub login_handler: LoginHandler,
    pub create_restaurant_handler: CreateRestaurantHandler,
    pub update_restaurant_handler: UpdateRestaurantHandler,
    pub delete_restaurant_handler: DeleteRestaurantHandler,
    pub create_table_handler: CreateTableHandler,
    pub update_table_handler: UpdateTableHandler,
    pub delete_table_handler: DeleteTableHandler,
    pub create_menu_item_handler: CreateMenuItemHandler,
    pub update_menu_item_handler: UpdateMenuItemHandler,
    pub set_availability_handler: SetMenuItemAvailabilityHandler,
    pub delete_menu_item_handler: DeleteMenuItemHandler,
    pub add_item_option_handler: AddItemOptionHandler,
    pub delete_item_option_handler: DeleteItemOptionHandler,
    pub create_reservation_handler: CreateReservationHandler,
    pub update_reservation_status_handler: UpdateReservationStatusHandler,
    pub submit_order_handler: SubmitOrderHandler,
    pub update_order_status_handler: UpdateOrderStatusHandler,

    // ========== Query Handlers ==========
    pub current_user_handler: GetCurrentUserHandler,
    pub get_restaurant_handler: GetRestaurantHandler,
    pub list_restaurants_handler: ListRestaurantsHandler,
    pub get_table_handler: GetTableHandler,
    pub list_tables_handler: ListTablesHandler,
    pub get_menu_item_handler: GetMenuItemHandler,
    pub list_menu_handler: ListMenuHandler,
    pub get_reservation_handler: GetReservationHandler,
    pub list_reservations_handler: ListReservationsHandler,
    pub get_order_handler: GetOrderHandler,
    pub list_orders_handler: ListOrdersHandler,
    pub list_table_orders_handler: ListTableOrdersHandler,
}

impl AppState {
    /// 创建应用状态
    ///
    /// 订单相关 handler 以 relay 作为 TableNotifierPort
    pub fn new(
        repos: Repositories,
        token_service: Arc<dyn TokenServicePort>,
        password_hasher: Arc<dyn PasswordHasherPort>,
        relay: Arc<TableRelay>,
        relay_requires_token: bool,
    ) -> Self {
        let notifier: Arc<dyn TableNotifierPort> = relay.clone();
        let r = repos.clone();

        Self {
            // Command handlers
            register_user_handler: RegisterUserHandler::new(
                r.users.clone(),
                password_hasher.clone(),
                token_service.clone(),
            ),
            login_handler: LoginHandler::new(
                r.users.clone(),
                password_hasher.clone(),
                token_service.clone(),
            ),
            create_restaurant_handler: CreateRestaurantHandler::new(r.restaurants.clone()),
            update_restaurant_handler: UpdateRestaurantHandler::new(r.restaurants.clone()),
            delete_restaurant_handler: DeleteRestaurantHandler::new(r.restaurants.clone()),
            create_table_handler: CreateTableHandler::new(r.restaurants.clone(), r.tables.clone()),
            update_table_handler: UpdateTableHandler::new(r.tables.clone()),
            delete_table_handler: DeleteTableHandler::new(r.tables.clone()),
            create_menu_item_handler: CreateMenuItemHandler::new(r.restaurants.clone(), r.menu.clone()),
            update_menu_item_handler: UpdateMenuItemHandler::new(r.menu.clone()),
            set_availability_handler: SetMenuItemAvailabilityHandler::new(r.menu.clone()),
            delete_menu_item_handler: DeleteMenuItemHandler::new(r.menu.clone()),
            add_item_option_handler: AddItemOptionHandler::new(r.menu.clone()),
            delete_item_option_handler: DeleteItemOptionHandler::new(r.menu.clone()),
            create_reservation_handler: CreateReservationHandler::new(
                r.restaurants.clone(),
                r.tables.clone(),
                r.reservations.clone(),
            ),
            update_reservation_status_handler: UpdateReservationStatusHandler::new(
                r.reservations.clone(),
            ),
            submit_order_handler: SubmitOrderHandler::new(
                r.tables.clone(),
                r.menu.clone(),
                r.orders.clone(),
                notifier.clone(),
            ),
            update_order_status_handler: UpdateOrderStatusHandler::new(r.orders.clone(), notifier),

            // Query handlers
            current_user_handler: GetCurrentUserHandler::new(r.users.clone()),
            get_restaurant_handler: GetRestaurantHandler::new(r.restaurants.clone()),
            list_restaurants_handler: ListRestaurantsHandler::new(r.restaurants.clone()),
            get_table_handler: GetTableHandler::new(r.tables.clone()),
            list_tables_handler: ListTablesHandler::new(r.restaurants.clone(), r.tables.clone()),
            get_menu_item_handler: GetMenuItemHandler::new(r.menu.clone()),
            list_menu_handler: ListMenuHandler::new(r.restaurants.clone(), r.menu.clone()),
            get_reservation_handler: GetReservationHandler::new(r.reservations.clone()),
            list_reservations_handler: ListReservationsHandler::new(
                r.restaurants.clone(),
                r.reservations.clone(),
            ),
            get_order_handler: GetOrderHandler::new(r.orders.clone()),
            list_orders_handler: ListOrdersHandler::new(r.restaurants.clone(), r.orders.clone()),
            list_table_orders_handler: ListTableOrdersHandler::new(r.orders.clone()),

            // Ports
            repos,
            token_service,
            password_hasher,
            relay,
            relay_requires_token,
        }
    }
}

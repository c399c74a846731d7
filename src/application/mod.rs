//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、TokenService、PasswordHasher、TableNotifier）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Auth commands
    BootstrapAdmin,
    Login,
    RegisterUser,
    // Restaurant commands
    CreateRestaurant,
    CreateTable,
    DeleteRestaurant,
    DeleteTable,
    UpdateRestaurant,
    UpdateTable,
    // Menu commands
    AddItemOption,
    CreateMenuItem,
    DeleteItemOption,
    DeleteMenuItem,
    SetMenuItemAvailability,
    UpdateMenuItem,
    // Reservation commands
    CreateReservation,
    UpdateReservationStatus,
    // Order commands
    SubmitOrder,
    SubmitOrderLine,
    UpdateOrderStatus,
    // Handlers
    handlers::{
        AddItemOptionHandler, BootstrapAdminHandler, CreateMenuItemHandler,
        CreateReservationHandler, CreateRestaurantHandler, CreateTableHandler,
        DeleteItemOptionHandler, DeleteMenuItemHandler, DeleteRestaurantHandler,
        DeleteTableHandler, LoginHandler, RegisterUserHandler, SessionView,
        SetMenuItemAvailabilityHandler, SubmitOrderHandler, UpdateMenuItemHandler,
        UpdateOrderStatusHandler, UpdateReservationStatusHandler, UpdateRestaurantHandler,
        UpdateTableHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Auth
    AuthClaims,
    AuthError,
    IssuedToken,
    PasswordHasherPort,
    TokenServicePort,
    // Repositories
    ItemOptionRecord,
    MenuItemRecord,
    MenuRepositoryPort,
    OrderLineRecord,
    OrderRecord,
    OrderRepositoryPort,
    RepositoryError,
    ReservationFilter,
    ReservationRecord,
    ReservationRepositoryPort,
    RestaurantRecord,
    RestaurantRepositoryPort,
    TableRecord,
    TableRepositoryPort,
    UserRecord,
    UserRepositoryPort,
    // Realtime
    TableNotifierPort,
};

pub use queries::{
    GetCurrentUser,
    GetMenuItem,
    GetOrder,
    GetReservation,
    GetRestaurant,
    GetTable,
    ListMenu,
    ListOrders,
    ListReservations,
    ListRestaurants,
    ListTableOrders,
    ListTables,
    // Handlers
    handlers::{
        GetCurrentUserHandler, GetMenuItemHandler, GetOrderHandler, GetReservationHandler,
        GetRestaurantHandler, GetTableHandler, ItemOptionView, ListMenuHandler,
        ListOrdersHandler, ListReservationsHandler, ListRestaurantsHandler,
        ListTableOrdersHandler, ListTablesHandler, MenuItemView, OrderLineView, OrderView,
        ReservationView, RestaurantView, TableView, UserView,
    },
};

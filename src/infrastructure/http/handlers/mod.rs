//! HTTP Handlers

mod auth;
mod menu;
mod order;
mod ping;
mod relay;
mod reservation;
mod restaurant;
mod table;
mod websocket;

pub use auth::*;
pub use menu::*;
pub use order::*;
pub use ping::*;
pub use relay::*;
pub use reservation::*;
pub use restaurant::*;
pub use table::*;
pub use websocket::*;

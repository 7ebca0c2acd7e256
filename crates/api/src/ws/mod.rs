//! WebSocket notification delivery.

pub mod dispatcher;
pub mod handler;

pub use dispatcher::Dispatcher;

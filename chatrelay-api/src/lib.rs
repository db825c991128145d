pub mod config;
pub mod error;
pub mod handlers;
pub mod helpers;
pub mod polling;
pub mod proxy;
pub mod session;

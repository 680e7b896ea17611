pub mod api;
pub mod catalog;
pub mod config;
pub mod content;
pub mod player;
pub mod server;
pub mod session;
pub mod store;
pub mod ws;

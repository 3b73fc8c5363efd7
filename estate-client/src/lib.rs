pub mod api_client;
pub mod auth;
pub mod controller;
pub mod error;
pub mod events;
pub mod forms;
pub mod gateway;
pub mod session;
pub mod settings;
pub mod shell;
pub mod transport;
pub mod utils;

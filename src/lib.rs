pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod format;
pub mod models;
pub mod render;
pub mod routes;
pub mod services;
pub mod state;

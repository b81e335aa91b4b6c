// Library root for Crew

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod core;
pub mod store;
pub mod telemetry;

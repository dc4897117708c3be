pub mod config;
pub mod services;

pub mod analytics;
pub mod backend;
pub mod config;
pub mod database;
pub mod error;
pub mod service;

// Filmorate - users, friendships, films and likes over a relational store

// Entity model - users, films, MPA ratings and edge relations
pub mod models;

// Validation shared by all storage backends
pub mod validation;

// Storage - SQLite database, storage traits and backends
pub mod database;
pub mod storage;

// Domain services and HTTP layer
pub mod services;
pub mod api;

// Common utilities
pub mod app_state;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};

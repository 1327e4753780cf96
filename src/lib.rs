//! # Campaigns Library
//!
//! Core of the campaigns & channels console: configuration, the storage
//! gateway, entity models, repositories, business services and the
//! line-oriented operator console.

pub mod config;
pub mod console;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod telemetry;
pub use migration;

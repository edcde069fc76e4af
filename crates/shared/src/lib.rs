//! Shared types, errors, and configuration for NetLedger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Enumeration/pagination types for list endpoints
//! - A single injected clock abstraction
//! - Application-wide error types
//! - Configuration management

pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AppConfig;
pub use error::{AppError, AppResult};

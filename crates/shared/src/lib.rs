//! Shared types, errors, and configuration for Corretaje.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types with HTTP status mapping
//! - Configuration management
//! - JWT token issuance and validation
//! - Authentication claim types

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

pub use auth::{Claims, LoginRequest, TokenPair};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};

//! Core business logic for Corretaje.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations
//! live here.
//!
//! # Modules
//!
//! - `commission` - Commission cascade and balance derivation for operations
//! - `password` - Argon2 password hashing for user credentials

pub mod commission;
pub mod password;

//! Core business logic for Fintrack.
//!
//! Pure domain logic with no web or database dependencies:
//! - Budget-limit evaluation for posted transactions
//! - Password hashing

pub mod auth;
pub mod budget;

//! # Synvia Domain
//!
//! Business domain types and models for the Synvia Platform client.
//!
//! This crate contains:
//! - Domain error types and Result definitions
//! - Configuration structures
//! - User profile and permission model
//! - Auth wire types exchanged with the backend
//! - Domain constants (storage keys, endpoints, timeouts)
//!
//! ## Architecture
//! - No dependencies on other Synvia crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;

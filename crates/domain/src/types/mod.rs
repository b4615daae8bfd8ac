//! Domain types and models

pub mod auth;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, TokenPair};
pub use user::{Role, UserProfile};

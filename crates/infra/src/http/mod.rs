//! HTTP transport
//!
//! Thin reqwest wrapper shared by the API client and the refresh endpoint.

pub mod client;
pub mod request_id;

pub use client::{HttpClient, HttpClientBuilder};
pub use request_id::generate_request_id;

//! # Ripple Shared
//!
//! Request and response types exchanged with API clients.
//! Kept free of domain dependencies so clients can reuse it.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;

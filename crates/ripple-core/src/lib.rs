//! # Ripple Core
//!
//! The domain layer of the Ripple social backend.
//! Entities, ports and the engagement rules that keep users, posts,
//! messages and notifications consistent. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;

//! # Orbit Core
//!
//! The domain layer of the Orbit social backend.
//! Entities, the friend-request state machine, ports, and the application
//! services that drive them. No infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};

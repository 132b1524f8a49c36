//! # Orbit Shared
//!
//! Request and response types for the HTTP API. Kept free of server
//! dependencies so clients can reuse them.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, MessageResponse};

//! # Blog Shared
//!
//! Wire types shared by the service layer and the HTTP server.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, FieldViolation};

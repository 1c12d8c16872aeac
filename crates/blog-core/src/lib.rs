//! # Blog Core
//!
//! The domain layer of the blog backend: entities, validation, ports and
//! the service layer. Nothing here knows about SQL, Redis or HTTP.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod validation;

pub use error::DomainError;

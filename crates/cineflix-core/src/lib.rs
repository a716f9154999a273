//! # Cineflix Core
//!
//! The domain layer of Cineflix.
//! Pure types, ports and authentication rules with zero infrastructure dependencies.

pub mod auth;
pub mod domain;
pub mod error;
pub mod ports;

pub use error::CatalogError;

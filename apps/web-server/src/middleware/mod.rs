//! Middleware, extractors and the error type handlers return.

pub mod cookies;
pub mod error;
pub mod route_gate;
pub mod session;

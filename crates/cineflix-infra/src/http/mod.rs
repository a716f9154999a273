//! Outbound HTTP: one JSON request wrapper shared by every API client.

mod request;

pub(crate) use request::default_client;
pub use request::{DEFAULT_TIMEOUT, HttpClient, RequestConfig, RequestError};

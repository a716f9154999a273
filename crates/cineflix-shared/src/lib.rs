//! # Cineflix Shared
//!
//! Wire types shared by the server and whatever renders its views.

pub mod dto;
pub mod forms;
pub mod response;

pub use forms::{FieldDescriptor, FieldError, FormMode};
pub use response::ErrorResponse;

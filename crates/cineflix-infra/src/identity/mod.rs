//! Credential stores backing the credentials sign-in.

mod memory;

pub use memory::InMemoryIdentityBackend;

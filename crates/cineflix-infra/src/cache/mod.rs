//! Query cache for catalog fetches.

mod query;

pub use query::{QueryClient, QueryConfig};

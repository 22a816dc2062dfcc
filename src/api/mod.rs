//! REST API over the contact store.

pub mod query;
pub mod server;
pub mod types;

pub use server::{ApiServer, DEFAULT_PORT};

pub mod api;
pub mod cli;
pub mod db;
pub mod filter;
pub mod logging;
pub mod models;
pub mod workspace;

pub use db::Database;

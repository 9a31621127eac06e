pub mod aggregator;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod paginator;
pub mod rate_limit;

pub use client::SearchClient;
pub use models::*;

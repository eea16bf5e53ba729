pub mod api;
pub mod client;
pub mod config;
pub mod data_models;
pub mod error;
pub mod query;
pub mod render;
pub mod session;

pub use client::SearchClient;
pub use error::{ClientError, Result};
pub use query::{SearchQuery, build_query};
pub use session::SearchSession;

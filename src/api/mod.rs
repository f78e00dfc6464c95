pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;

pub use client::{Access, ApiClient};
pub use error::ApiError;

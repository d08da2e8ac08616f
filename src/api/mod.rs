pub mod client;
pub mod types;

pub use client::{BackendApi, HttpBackendClient};
pub use types::*;

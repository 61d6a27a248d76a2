mod client;
mod types;

pub use client::{QueryBackend, RagApiClient};
pub use types::{Answer, HealthReport, QueryRequest, QueryResponse};

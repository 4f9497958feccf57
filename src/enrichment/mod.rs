//! Third-party enrichment services: weather, flight status, city photos,
//! push dispatch, and the assistant. Plain request/response clients — no
//! retries; a bounded timeout, with timeout treated as a network failure.

pub mod assistant;
pub mod flights;
pub mod photos;
pub mod push;
pub mod weather;

use std::time::Duration;

/// Every enrichment call must complete within this window.
pub const ENRICHMENT_TIMEOUT: Duration = Duration::from_secs(8);

/// Shared HTTP client with the enrichment timeout applied.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(ENRICHMENT_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

//! Roadbook — touring-logistics dashboard core.
//!
//! The crate is organized around three layers:
//!
//! - `source` + `queries`: typed reads against the remote tour database
//! - `enrichment` + `cache`: third-party lookups (weather, flight status,
//!   city photos) with an on-disk fallback cache
//! - `widgets` + `dashboard`: per-widget loaders feeding an aggregator
//!   that owns layout order, pull-to-refresh, and the greeting header
//!
//! Every widget load resolves to a `loader::WidgetState`: loading, loaded
//! (fresh or stale), or errored. Stale means the value came from the cache
//! after a live fetch failed.

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod enrichment;
pub mod error;
pub mod layout;
pub mod loader;
pub mod poller;
pub mod queries;
pub mod source;
pub mod state;
pub mod types;
pub mod widgets;

#[cfg(test)]
pub(crate) mod testing;

pub use dashboard::Dashboard;
pub use error::WidgetError;
pub use loader::WidgetState;
pub use state::AppState;

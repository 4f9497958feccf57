//! Widget data loaders.
//!
//! One module per domain. Every loader returns a whole `WidgetState` and
//! never panics: a loader's failure stays inside its own widget, the rest of
//! the dashboard renders regardless.

pub mod city_photo;
pub mod flight;
pub mod hotel;
pub mod weather;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::WidgetError;
use crate::loader::WidgetState;
use crate::state::AppState;

/// The four widget domains, in default layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Flight,
    Hotel,
    Weather,
    CityPhoto,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 4] = [
        WidgetKind::Flight,
        WidgetKind::Hotel,
        WidgetKind::Weather,
        WidgetKind::CityPhoto,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            WidgetKind::Flight => "Flight",
            WidgetKind::Hotel => "Hotel",
            WidgetKind::Weather => "Weather",
            WidgetKind::CityPhoto => "Next City",
        }
    }

    /// Cache/logging domain identifier.
    pub fn domain(&self) -> &'static str {
        match self {
            WidgetKind::Flight => "flight",
            WidgetKind::Hotel => "hotel",
            WidgetKind::Weather => "weather",
            WidgetKind::CityPhoto => "city_photo",
        }
    }

    /// Route for the domain's detail view. Pure navigation side effect.
    pub fn detail_route(&self) -> &'static str {
        match self {
            WidgetKind::Flight | WidgetKind::Hotel => "/itinerary",
            WidgetKind::Weather => "/weather",
            WidgetKind::CityPhoto => "/tours",
        }
    }
}

/// One dashboard group: identifier plus display title.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetGroup {
    pub id: WidgetKind,
    pub title: String,
}

impl From<WidgetKind> for WidgetGroup {
    fn from(kind: WidgetKind) -> Self {
        WidgetGroup {
            id: kind,
            title: kind.title().to_string(),
        }
    }
}

/// Overwrite the cache entry for a key after a successful enrichment fetch.
/// A cache write failure is logged, never surfaced — the fresh value already
/// won.
pub(crate) fn store_enrichment<T: Serialize>(
    app: &AppState,
    domain: &str,
    key: &str,
    value: &T,
) {
    let result = app.with_cache(|db| db.put(domain, key, value));
    if let Some(Err(e)) = result {
        log::warn!("cache write failed for {}/{}: {}", domain, key, e);
    }
}

/// Stale-cache fallback: when a live fetch failed recoverably and a previous
/// success is cached under the same key, serve it marked stale. Otherwise
/// the error stands.
pub(crate) fn recover_from_cache<T: DeserializeOwned>(
    app: &AppState,
    domain: &str,
    key: &str,
    err: WidgetError,
) -> WidgetState<T> {
    if err.is_recoverable() {
        let cached = app.with_cache(|db| db.get(domain, key)).flatten();
        if let Some(entry) = cached {
            if let Some(value) = entry.decode::<T>() {
                log::info!(
                    "{} unavailable — serving cached {} from {}",
                    domain,
                    key,
                    entry.fetched_at
                );
                return WidgetState::stale(value);
            }
        }
    }
    WidgetState::Errored(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheDb;
    use crate::config::Config;

    fn state_with_cache() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let db = CacheDb::open_at(&dir.path().join("cache.db")).unwrap();
        (dir, AppState::with_parts(Some(Config::default()), Some(db)))
    }

    #[test]
    fn recoverable_error_with_cache_serves_stale() {
        let (_dir, app) = state_with_cache();
        store_enrichment(&app, "weather", "weather_Berlin_metric", &"cached-report");

        let state: WidgetState<String> = recover_from_cache(
            &app,
            "weather",
            "weather_Berlin_metric",
            WidgetError::Unavailable("offline".into()),
        );
        assert_eq!(state, WidgetState::stale("cached-report".to_string()));
    }

    #[test]
    fn recoverable_error_without_cache_stays_an_error() {
        let (_dir, app) = state_with_cache();
        let state: WidgetState<String> = recover_from_cache(
            &app,
            "weather",
            "weather_Oslo_metric",
            WidgetError::Unavailable("offline".into()),
        );
        assert!(matches!(state, WidgetState::Errored(WidgetError::Unavailable(_))));
    }

    #[test]
    fn non_recoverable_errors_never_touch_the_cache() {
        let (_dir, app) = state_with_cache();
        store_enrichment(&app, "weather", "k", &"cached");
        let state: WidgetState<String> =
            recover_from_cache(&app, "weather", "k", WidgetError::NotConfigured("Weather"));
        assert_eq!(
            state,
            WidgetState::Errored(WidgetError::NotConfigured("Weather"))
        );
    }

    #[test]
    fn default_group_titles() {
        let group: WidgetGroup = WidgetKind::CityPhoto.into();
        assert_eq!(group.title, "Next City");
        assert_eq!(group.id.domain(), "city_photo");
    }
}

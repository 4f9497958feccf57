//! Weather widget loader.
//!
//! City comes from the nearest upcoming event, unit from the user's
//! preferences (config default when no row exists). A failed or timed-out
//! fetch serves the cached report for the same city + unit marked stale.

use crate::enrichment::weather::{self, WeatherReport};
use crate::error::WidgetError;
use crate::loader::WidgetState;
use crate::queries;
use crate::source::RemoteSource;
use crate::state::AppState;

pub const DOMAIN: &str = "weather";

/// Settle a completed fetch against the cache: success overwrites the
/// entry, recoverable failure reads it back.
fn settle(
    app: &AppState,
    key: &str,
    fetched: Result<WeatherReport, WidgetError>,
) -> WidgetState<WeatherReport> {
    match fetched {
        Ok(report) => {
            super::store_enrichment(app, DOMAIN, key, &report);
            WidgetState::fresh(report)
        }
        Err(e) => super::recover_from_cache(app, DOMAIN, key, e),
    }
}

/// Load the weather widget.
pub async fn load(app: &AppState, source: &dyn RemoteSource) -> WidgetState<WeatherReport> {
    let config = match app.config_snapshot() {
        Some(c) => c,
        None => return WidgetState::Errored(WidgetError::NotConfigured("Weather")),
    };
    let api_key = match config.weather_api_key {
        Some(key) => key,
        None => return WidgetState::Errored(WidgetError::NotConfigured("Weather")),
    };

    let city = match queries::next_event(source).await {
        Ok(Some(event)) => match event.city {
            Some(city) if !city.is_empty() => city,
            _ => return WidgetState::Errored(WidgetError::NotFound),
        },
        Ok(None) => return WidgetState::Errored(WidgetError::NotFound),
        Err(e) => return WidgetState::Errored(e),
    };

    let unit = match queries::user_preferences(source).await {
        Ok(Some(prefs)) => prefs.temp_unit,
        // Preference lookup failures fall back to the configured unit.
        _ => config.temp_unit,
    };

    let key = weather::cache_key(&city, unit);
    let fetched = weather::fetch_weather(&app.http, &api_key, &city, unit).await;
    settle(app, &key, fetched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheDb;
    use crate::config::Config;
    use crate::testing::MemorySource;
    use crate::types::TempUnit;
    use serde_json::json;

    fn report(city: &str, temp: f64) -> WeatherReport {
        WeatherReport {
            city: city.into(),
            temperature: temp,
            feels_like: temp - 1.0,
            high: temp + 2.0,
            low: temp - 3.0,
            condition: "Clouds".into(),
            icon: "04d".into(),
            unit: TempUnit::Metric,
        }
    }

    fn app_with_cache() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let db = CacheDb::open_at(&dir.path().join("cache.db")).unwrap();
        (dir, AppState::with_parts(Some(Config::default()), Some(db)))
    }

    #[test]
    fn success_caches_and_returns_fresh() {
        let (_dir, app) = app_with_cache();
        let key = weather::cache_key("Berlin", TempUnit::Metric);

        let state = settle(&app, &key, Ok(report("Berlin", 18.0)));
        assert_eq!(state, WidgetState::fresh(report("Berlin", 18.0)));
        assert_eq!(app.with_cache(|db| db.count()), Some(1));
    }

    #[test]
    fn failure_after_success_serves_the_prior_values_stale() {
        let (_dir, app) = app_with_cache();
        let key = weather::cache_key("Berlin", TempUnit::Metric);

        settle(&app, &key, Ok(report("Berlin", 18.0)));
        let state = settle(
            &app,
            &key,
            Err(WidgetError::Unavailable("request timed out".into())),
        );
        assert_eq!(state, WidgetState::stale(report("Berlin", 18.0)));
    }

    #[test]
    fn failure_with_no_prior_success_is_an_error() {
        let (_dir, app) = app_with_cache();
        let state = settle(
            &app,
            &weather::cache_key("Oslo", TempUnit::Metric),
            Err(WidgetError::Unavailable("offline".into())),
        );
        assert!(matches!(state, WidgetState::Errored(_)));
    }

    #[tokio::test]
    async fn missing_api_key_is_not_configured() {
        let app = AppState::with_parts(Some(Config::default()), None);
        let source = MemorySource::with_rows(
            "events",
            vec![json!({"id": "e1", "city": "Berlin", "start_time": "2999-06-01T20:00:00Z"})],
        );
        let state = load(&app, &source).await;
        assert_eq!(
            state,
            WidgetState::Errored(WidgetError::NotConfigured("Weather"))
        );
    }

    #[tokio::test]
    async fn no_upcoming_event_is_the_empty_state() {
        let mut config = Config::default();
        config.weather_api_key = Some("k".into());
        let app = AppState::with_parts(Some(config), None);
        let state = load(&app, &MemorySource::new()).await;
        assert!(state.is_empty_state());
    }
}

//! City photo widget loader.
//!
//! Shows the next city on the tour over a photo of it. Photos come from the
//! in-memory TTL cache when fresh; the search API is only hit on a miss.
//! No offline fallback here — the fallback policy covers flight and weather
//! only.

use serde::Serialize;

use crate::enrichment::photos::{self, CachedPhoto, CityPhoto};
use crate::error::WidgetError;
use crate::loader::WidgetState;
use crate::queries;
use crate::source::RemoteSource;
use crate::state::AppState;
use crate::types::{self, TourEvent};

pub const DOMAIN: &str = "city_photo";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityPhotoCard {
    pub city: String,
    pub venue: String,
    pub event_date: String,
    pub photo: CityPhoto,
}

fn card(event: &TourEvent, city: &str, photo: CityPhoto) -> CityPhotoCard {
    CityPhotoCard {
        city: city.to_string(),
        venue: event.venue.clone().unwrap_or_default(),
        event_date: types::format_day(event.start_time.as_deref()),
        photo,
    }
}

/// Load the city-photo widget.
pub async fn load(app: &AppState, source: &dyn RemoteSource) -> WidgetState<CityPhotoCard> {
    let api_key = match app.config_snapshot().and_then(|c| c.photo_api_key) {
        Some(key) => key,
        None => return WidgetState::Errored(WidgetError::NotConfigured("City photos")),
    };

    let event = match queries::next_event(source).await {
        Ok(Some(event)) => event,
        Ok(None) => return WidgetState::Errored(WidgetError::NotFound),
        Err(e) => return WidgetState::Errored(e),
    };
    let city = match event.city.clone() {
        Some(city) if !city.is_empty() => city,
        _ => return WidgetState::Errored(WidgetError::NotFound),
    };

    let key = photos::cache_key(&city);
    if let Some(entry) = app.photo_cache.get(&key) {
        if entry.fresh_at(chrono::Utc::now()) {
            return WidgetState::fresh(card(&event, &city, entry.photo.clone()));
        }
    }

    match photos::fetch_city_photo(&app.http, &api_key, &city).await {
        Ok(Some(photo)) => {
            app.photo_cache.insert(key, CachedPhoto::new(photo.clone()));
            WidgetState::fresh(card(&event, &city, photo))
        }
        Ok(None) => WidgetState::Errored(WidgetError::NotFound),
        Err(e) => WidgetState::Errored(e),
    }
}

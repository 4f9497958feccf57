//! Flight widget loader.
//!
//! Base data is the nearest upcoming travel segment from the data source;
//! the live status from the flight feed is an overlay. A missing flight API
//! key is not fatal here — the card renders from the segment with the
//! default "Scheduled" status. A failed live fetch falls back to the cached
//! status for the same flight + date, marked stale.

use serde::Serialize;

use crate::enrichment::flights::{self, LiveFlightStatus};
use crate::error::WidgetError;
use crate::loader::WidgetState;
use crate::queries;
use crate::source::RemoteSource;
use crate::state::AppState;
use crate::types::{self, TravelSegment, NOT_AVAILABLE};

pub const DOMAIN: &str = "flight";

/// Rendered flight card: every field already a display string, malformed
/// pieces degraded to "N/A" individually.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightCard {
    pub airline: String,
    pub flight_number: String,
    pub dep_city: String,
    pub arr_city: String,
    pub dep_time: String,
    pub arr_time: String,
    pub status: String,
}

fn text_or_na(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Card from the segment alone, default status.
pub fn base_card(segment: &TravelSegment) -> FlightCard {
    FlightCard {
        airline: text_or_na(segment.airline.as_deref()),
        flight_number: text_or_na(segment.flight_number.as_deref()),
        dep_city: text_or_na(segment.dep_city.as_deref()),
        arr_city: text_or_na(segment.arr_city.as_deref()),
        dep_time: types::format_time(segment.dep_time.as_deref()),
        arr_time: types::format_time(segment.arr_time.as_deref()),
        status: flights::DEFAULT_STATUS.to_string(),
    }
}

/// Overlay live feed data onto the base card. Feed fields win only where
/// present.
pub fn apply_live(mut card: FlightCard, live: &LiveFlightStatus) -> FlightCard {
    card.status = live.status.clone();
    if let Some(airline) = &live.airline {
        card.airline = airline.clone();
    }
    if live.dep_scheduled.is_some() {
        card.dep_time = types::format_time(live.dep_scheduled.as_deref());
    }
    if live.arr_scheduled.is_some() {
        card.arr_time = types::format_time(live.arr_scheduled.as_deref());
    }
    card
}

/// Load the flight widget.
pub async fn load(app: &AppState, source: &dyn RemoteSource) -> WidgetState<FlightCard> {
    let segment = match queries::next_travel_segment(source).await {
        Ok(Some(segment)) => segment,
        Ok(None) => return WidgetState::Errored(WidgetError::NotFound),
        Err(e) => return WidgetState::Errored(e),
    };

    let card = base_card(&segment);

    let api_key = app
        .config_snapshot()
        .and_then(|c| c.flight_api_key);
    let flight_number = segment.flight_number.clone();
    let flight_date = types::date_component(segment.dep_time.as_deref());

    let (api_key, flight_number, flight_date) = match (api_key, flight_number, flight_date) {
        (Some(key), Some(number), Some(date)) => (key, number, date),
        // No live call possible: the card stands with its default status.
        _ => return WidgetState::fresh(card),
    };

    let key = flights::cache_key(&flight_number, &flight_date);
    match flights::fetch_flight_status(&app.http, &api_key, &flight_number, &flight_date).await
    {
        Ok(Some(live)) => {
            super::store_enrichment(app, DOMAIN, &key, &live);
            WidgetState::fresh(apply_live(card, &live))
        }
        // Feed has no row for this flight; keep the source-of-record card.
        Ok(None) => WidgetState::fresh(card),
        Err(e) => match super::recover_from_cache::<LiveFlightStatus>(app, DOMAIN, &key, e) {
            WidgetState::Loaded { value, .. } => WidgetState::stale(apply_live(card, &value)),
            WidgetState::Errored(err) if err.is_recoverable() => WidgetState::Errored(err),
            // Malformed feed payload: status stays default rather than
            // taking down a card whose base data is sound.
            _ => WidgetState::fresh(card),
        },
    }
}

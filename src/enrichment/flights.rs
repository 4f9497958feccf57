//! AviationStack flight-status client.

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

const FLIGHTS_ENDPOINT: &str = "https://api.aviationstack.com/v1/flights";

// ============================================================================
// API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct FlightsResponse {
    #[serde(default)]
    data: Vec<FlightRaw>,
}

#[derive(Debug, Deserialize)]
struct FlightRaw {
    #[serde(default)]
    flight_status: Option<String>,
    airline: Option<NamedBlock>,
    flight: Option<FlightIdentBlock>,
    departure: Option<EndpointBlock>,
    arrival: Option<EndpointBlock>,
}

#[derive(Debug, Deserialize)]
struct NamedBlock {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FlightIdentBlock {
    #[serde(default)]
    iata: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EndpointBlock {
    #[serde(default)]
    airport: Option<String>,
    #[serde(default)]
    scheduled: Option<String>,
}

// ============================================================================
// Public types
// ============================================================================

/// Live status for one flight, normalized from the first matching result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFlightStatus {
    pub airline: Option<String>,
    pub flight_iata: Option<String>,
    pub status: String,
    pub dep_airport: Option<String>,
    pub dep_scheduled: Option<String>,
    pub arr_airport: Option<String>,
    pub arr_scheduled: Option<String>,
}

/// Status shown when no live status call is configured or the feed omits one.
pub const DEFAULT_STATUS: &str = "Scheduled";

/// Cache key for the offline fallback, one entry per flight + date.
pub fn cache_key(flight_number: &str, flight_date: &str) -> String {
    format!("flight_{}_{}", flight_number, flight_date)
}

fn normalize(raw: FlightRaw) -> LiveFlightStatus {
    LiveFlightStatus {
        airline: raw.airline.and_then(|a| a.name),
        flight_iata: raw.flight.and_then(|f| f.iata),
        status: raw
            .flight_status
            .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        dep_airport: raw.departure.as_ref().and_then(|d| d.airport.clone()),
        dep_scheduled: raw.departure.as_ref().and_then(|d| d.scheduled.clone()),
        arr_airport: raw.arrival.as_ref().and_then(|a| a.airport.clone()),
        arr_scheduled: raw.arrival.as_ref().and_then(|a| a.scheduled.clone()),
    }
}

/// Fetch live status for a flight on a date ("YYYY-MM-DD").
///
/// `Ok(None)` when the feed has no row for the flight — callers keep the
/// source-of-record card and the default status.
pub async fn fetch_flight_status(
    client: &reqwest::Client,
    api_key: &str,
    flight_iata: &str,
    flight_date: &str,
) -> Result<Option<LiveFlightStatus>, WidgetError> {
    let response = client
        .get(FLIGHTS_ENDPOINT)
        .query(&[
            ("access_key", api_key),
            ("flight_iata", flight_iata),
            ("flight_date", flight_date),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(WidgetError::Unavailable(format!(
            "flight service returned {}: {}",
            status, body
        )));
    }

    let mut raw: FlightsResponse = response
        .json()
        .await
        .map_err(|e| WidgetError::Invalid(format!("flight payload: {}", e)))?;
    if raw.data.is_empty() {
        return Ok(None);
    }
    Ok(Some(normalize(raw.data.remove(0))))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "data": [{
            "flight_status": "active",
            "airline": {"name": "Delta Air Lines"},
            "flight": {"iata": "DL123"},
            "departure": {"airport": "John F Kennedy Intl", "scheduled": "2024-06-01T10:00:00+00:00"},
            "arrival": {"airport": "Heathrow", "scheduled": "2024-06-01T14:00:00+00:00"}
        }]
    }"#;

    #[test]
    fn first_result_normalizes() {
        let mut raw: FlightsResponse = serde_json::from_str(FIXTURE).unwrap();
        let live = normalize(raw.data.remove(0));
        assert_eq!(live.airline.as_deref(), Some("Delta Air Lines"));
        assert_eq!(live.flight_iata.as_deref(), Some("DL123"));
        assert_eq!(live.status, "active");
        assert_eq!(live.dep_airport.as_deref(), Some("John F Kennedy Intl"));
    }

    #[test]
    fn absent_status_defaults_to_scheduled() {
        let raw: FlightRaw = serde_json::from_str(r#"{"flight": {"iata": "DL123"}}"#).unwrap();
        let live = normalize(raw);
        assert_eq!(live.status, DEFAULT_STATUS);
        assert!(live.airline.is_none());
    }

    #[test]
    fn cache_key_is_flight_and_date() {
        assert_eq!(cache_key("DL123", "2024-06-01"), "flight_DL123_2024-06-01");
    }
}

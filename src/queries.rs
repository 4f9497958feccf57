//! Typed reads over the generic source interface.
//!
//! Each widget wants exactly one row: the nearest upcoming record for its
//! domain, ordered ascending on the temporal field (ties break by id, which
//! the source layer appends as a secondary sort). An empty result is `None`,
//! never an error — the loader maps it to the widget's empty state.

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::WidgetError;
use crate::source::{Filter, RemoteSource, SourceQuery};
use crate::types::{Accommodation, Guest, Tour, TourEvent, TravelSegment, UserPreferences};

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn decode<T: DeserializeOwned>(row: Value) -> Result<T, WidgetError> {
    serde_json::from_value(row).map_err(|e| WidgetError::Invalid(e.to_string()))
}

async fn first<T: DeserializeOwned>(
    source: &dyn RemoteSource,
    query: SourceQuery,
) -> Result<Option<T>, WidgetError> {
    let mut rows = source.read(&query).await?;
    match rows.pop() {
        Some(row) => Ok(Some(decode(row)?)),
        None => Ok(None),
    }
}

/// Soonest travel segment with a departure strictly in the future.
pub async fn next_travel_segment(
    source: &dyn RemoteSource,
) -> Result<Option<TravelSegment>, WidgetError> {
    first(
        source,
        SourceQuery::collection("travel_segments")
            .filter(Filter::Gt("dep_time", json!(now_iso())))
            .order_ascending("dep_time")
            .limit(1),
    )
    .await
}

/// Soonest accommodation by check-in, past or future — the stay the user is
/// in (or about to start) is the relevant one, matching the source app.
pub async fn next_accommodation(
    source: &dyn RemoteSource,
) -> Result<Option<Accommodation>, WidgetError> {
    first(
        source,
        SourceQuery::collection("accommodations")
            .order_ascending("check_in")
            .limit(1),
    )
    .await
}

/// Soonest event by start time.
pub async fn next_event(source: &dyn RemoteSource) -> Result<Option<TourEvent>, WidgetError> {
    first(
        source,
        SourceQuery::collection("events")
            .order_ascending("start_time")
            .limit(1),
    )
    .await
}

pub async fn tour_by_id(
    source: &dyn RemoteSource,
    tour_id: &str,
) -> Result<Option<Tour>, WidgetError> {
    first(
        source,
        SourceQuery::collection("tours")
            .filter(Filter::Eq("id", json!(tour_id)))
            .limit(1),
    )
    .await
}

/// Current user's preferences row, if any.
pub async fn user_preferences(
    source: &dyn RemoteSource,
) -> Result<Option<UserPreferences>, WidgetError> {
    first(
        source,
        SourceQuery::collection("users").order_ascending("id").limit(1),
    )
    .await
}

/// Guest list for an event, oldest first.
pub async fn guests_for_event(
    source: &dyn RemoteSource,
    event_id: &str,
) -> Result<Vec<Guest>, WidgetError> {
    let rows = source
        .read(
            &SourceQuery::collection("guests")
                .filter(Filter::Eq("event_id", json!(event_id)))
                .order_ascending("id"),
        )
        .await?;
    rows.into_iter().map(decode).collect()
}

/// Add a guest to an event's list. The only write path the core owns.
pub async fn add_guest(
    source: &dyn RemoteSource,
    event_id: &str,
    name: &str,
    note: Option<&str>,
) -> Result<Guest, WidgetError> {
    let guest = Guest {
        id: uuid::Uuid::new_v4().to_string(),
        event_id: event_id.to_string(),
        name: name.to_string(),
        note: note.map(|n| n.to_string()),
    };
    let row = source
        .insert("guests", serde_json::to_value(&guest).unwrap_or(Value::Null))
        .await?;
    decode(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemorySource;
    use crate::types::GuestCategory;

    fn segment(id: &str, dep_time: &str) -> Value {
        json!({
            "id": id,
            "airline": "Delta",
            "flight_number": "DL123",
            "dep_city": "New York",
            "arr_city": "London",
            "dep_time": dep_time,
            "arr_time": "2999-01-02T08:00:00Z",
        })
    }

    #[tokio::test]
    async fn next_segment_skips_departed_flights() {
        let source = MemorySource::with_rows(
            "travel_segments",
            vec![
                segment("a", "2001-01-01T10:00:00Z"),
                segment("b", "2999-01-01T10:00:00Z"),
            ],
        );
        let next = next_travel_segment(&source).await.unwrap().unwrap();
        assert_eq!(next.id, "b");
    }

    #[tokio::test]
    async fn ties_on_departure_break_by_id() {
        let source = MemorySource::with_rows(
            "travel_segments",
            vec![
                segment("z", "2999-01-01T10:00:00Z"),
                segment("a", "2999-01-01T10:00:00Z"),
            ],
        );
        let next = next_travel_segment(&source).await.unwrap().unwrap();
        assert_eq!(next.id, "a");
    }

    #[tokio::test]
    async fn empty_collection_is_none_not_an_error() {
        let source = MemorySource::new();
        assert!(next_travel_segment(&source).await.unwrap().is_none());
        assert!(next_accommodation(&source).await.unwrap().is_none());
        assert!(next_event(&source).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn outage_surfaces_as_unavailable() {
        let source = MemorySource::new();
        source.fail_reads(true);
        let err = next_event(&source).await.err().unwrap();
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn malformed_row_is_invalid() {
        // Missing required id field
        let source = MemorySource::with_rows("events", vec![json!({"city": "Berlin"})]);
        let err = next_event(&source).await.err().unwrap();
        assert!(matches!(err, WidgetError::Invalid(_)));
    }

    #[tokio::test]
    async fn add_guest_round_trips_with_derived_category() {
        let source = MemorySource::new();
        let guest = add_guest(&source, "ev1", "Sam", Some("photographer, front pit"))
            .await
            .unwrap();
        assert_eq!(guest.category(), GuestCategory::Photographer);

        let guests = guests_for_event(&source, "ev1").await.unwrap();
        assert_eq!(guests.len(), 1);
        assert_eq!(guests[0].name, "Sam");
    }
}

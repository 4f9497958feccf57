//! Shared domain types.
//!
//! Entities mirror the hosted data source's tables (snake_case columns on
//! the wire). Timestamps stay raw strings as stored: the source never
//! validates them, so parsing is deferred to display time where a bad value
//! degrades to an "N/A" placeholder instead of failing the widget.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Entities (owned by the remote data source)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    /// Public share identifier for the read-only calendar page.
    #[serde(default)]
    pub share_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Performance,
    Travel,
    Press,
    Studio,
    Rest,
    #[serde(other)]
    Other,
}

impl Default for EventCategory {
    fn default() -> Self {
        EventCategory::Other
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourEvent {
    pub id: String,
    #[serde(default)]
    pub tour_id: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub category: EventCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelSegment {
    pub id: String,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub flight_number: Option<String>,
    #[serde(default)]
    pub dep_city: Option<String>,
    #[serde(default)]
    pub arr_city: Option<String>,
    #[serde(default)]
    pub dep_time: Option<String>,
    #[serde(default)]
    pub arr_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accommodation {
    pub id: String,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub check_in: Option<String>,
    #[serde(default)]
    pub check_out: Option<String>,
    #[serde(default)]
    pub confirmation_number: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub id: String,
    pub event_id: String,
    pub name: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Display category derived from the guest's free-text note by keyword match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestCategory {
    Photographer,
    Videographer,
    Crew,
    Other,
}

impl GuestCategory {
    pub fn from_note(note: Option<&str>) -> Self {
        let lowered = note.unwrap_or_default().to_lowercase();
        if lowered.contains("photographer") {
            GuestCategory::Photographer
        } else if lowered.contains("videographer") {
            GuestCategory::Videographer
        } else if lowered.contains("crew") {
            GuestCategory::Crew
        } else {
            GuestCategory::Other
        }
    }
}

impl Guest {
    pub fn category(&self) -> GuestCategory {
        GuestCategory::from_note(self.note.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempUnit {
    Metric,
    Imperial,
}

impl Default for TempUnit {
    fn default() -> Self {
        TempUnit::Metric
    }
}

impl TempUnit {
    /// Value the weather API expects in its `units` parameter.
    pub fn api_value(&self) -> &'static str {
        match self {
            TempUnit::Metric => "metric",
            TempUnit::Imperial => "imperial",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TempUnit::Metric => "°C",
            TempUnit::Imperial => "°F",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub temp_unit: TempUnit,
    #[serde(default)]
    pub calendar_sync_enabled: bool,
}

// ============================================================================
// Timestamp formatting (lenient)
// ============================================================================

/// Placeholder for absent or unparseable fields.
pub const NOT_AVAILABLE: &str = "N/A";

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.to_utc());
    }
    // Source rows sometimes store naive local-less timestamps
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .map(|dt| dt.and_utc())
        .ok()
}

/// "HH:MM" in the viewer's local time, or "N/A".
pub fn format_time(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.with_timezone(&chrono::Local).format("%H:%M").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// "Sat, Jun 1" in the viewer's local time, or "N/A".
pub fn format_day(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%a, %b %-d")
                .to_string()
        })
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Full local date + time, or "N/A".
pub fn format_date_time(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%a, %b %-d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// "YYYY-MM-DD" (UTC) for enrichment calls keyed by flight date.
pub fn date_component(raw: Option<&str>) -> Option<String> {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
}

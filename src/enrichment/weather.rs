//! OpenWeatherMap current-weather client.

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;
use crate::types::TempUnit;

const WEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

// ============================================================================
// API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    name: String,
    main: MainBlock,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    feels_like: f64,
    temp_max: f64,
    temp_min: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    main: String,
    #[serde(default)]
    icon: String,
}

// ============================================================================
// Public types
// ============================================================================

/// Normalized current weather for one city. Cached verbatim as the offline
/// fallback payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub high: f64,
    pub low: f64,
    pub condition: String,
    /// OpenWeather icon code, e.g. "04d".
    pub icon: String,
    pub unit: TempUnit,
}

impl WeatherReport {
    /// "18°C" style rendering for any of the temperature fields.
    pub fn format_temp(&self, value: f64) -> String {
        format!("{}{}", value.round() as i64, self.unit.symbol())
    }
}

/// Cache key for the stale-weather fallback, one entry per city + unit.
pub fn cache_key(city: &str, unit: TempUnit) -> String {
    format!("weather_{}_{}", city, unit.api_value())
}

fn normalize(raw: WeatherResponse, unit: TempUnit) -> WeatherReport {
    let condition = raw.weather.first();
    WeatherReport {
        city: raw.name,
        temperature: raw.main.temp,
        feels_like: raw.main.feels_like,
        high: raw.main.temp_max,
        low: raw.main.temp_min,
        condition: condition.map(|c| c.main.clone()).unwrap_or_default(),
        icon: condition.map(|c| c.icon.clone()).unwrap_or_default(),
        unit,
    }
}

/// Fetch current weather for a city.
pub async fn fetch_weather(
    client: &reqwest::Client,
    api_key: &str,
    city: &str,
    unit: TempUnit,
) -> Result<WeatherReport, WidgetError> {
    let response = client
        .get(WEATHER_ENDPOINT)
        .query(&[
            ("q", city),
            ("appid", api_key),
            ("units", unit.api_value()),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(WidgetError::Unavailable(format!(
            "weather service returned {}: {}",
            status, body
        )));
    }

    let raw: WeatherResponse = response
        .json()
        .await
        .map_err(|e| WidgetError::Invalid(format!("weather payload: {}", e)))?;
    Ok(normalize(raw, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "name": "Berlin",
        "main": {"temp": 18.42, "feels_like": 17.9, "temp_max": 21.0, "temp_min": 14.3},
        "weather": [{"main": "Clouds", "icon": "04d"}]
    }"#;

    #[test]
    fn response_normalizes_all_five_display_fields() {
        let raw: WeatherResponse = serde_json::from_str(FIXTURE).unwrap();
        let report = normalize(raw, TempUnit::Metric);
        assert_eq!(report.city, "Berlin");
        assert_eq!(report.temperature, 18.42);
        assert_eq!(report.feels_like, 17.9);
        assert_eq!(report.high, 21.0);
        assert_eq!(report.low, 14.3);
        assert_eq!(report.condition, "Clouds");
        assert_eq!(report.format_temp(report.temperature), "18°C");
    }

    #[test]
    fn missing_conditions_block_degrades_to_empty_strings() {
        let raw: WeatherResponse = serde_json::from_str(
            r#"{"name": "Oslo", "main": {"temp": 1.0, "feels_like": -2.0, "temp_max": 2.0, "temp_min": 0.0}}"#,
        )
        .unwrap();
        let report = normalize(raw, TempUnit::Imperial);
        assert_eq!(report.condition, "");
        assert_eq!(report.format_temp(report.temperature), "1°F");
    }

    #[test]
    fn cache_key_includes_the_unit() {
        assert_eq!(cache_key("Berlin", TempUnit::Metric), "weather_Berlin_metric");
        assert_eq!(
            cache_key("Berlin", TempUnit::Imperial),
            "weather_Berlin_imperial"
        );
    }

    #[test]
    fn report_round_trips_through_the_cache_encoding() {
        let report = WeatherReport {
            city: "Berlin".into(),
            temperature: 18.0,
            feels_like: 17.0,
            high: 21.0,
            low: 14.0,
            condition: "Clouds".into(),
            icon: "04d".into(),
            unit: TempUnit::Metric,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(serde_json::from_str::<WeatherReport>(&json).unwrap(), report);
    }
}

//! Unsplash city-photo client with a TTL'd in-memory cache entry type.
//!
//! The cache itself is a `DashMap` owned by `AppState` — one explicit object
//! with process lifetime, keyed `city-{name}`, entries expiring after 24 h.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

const SEARCH_ENDPOINT: &str = "https://api.unsplash.com/search/photos";

/// In-memory photo cache entries expire after this long.
pub const PHOTO_CACHE_TTL_HOURS: i64 = 24;

// ============================================================================
// API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<PhotoRaw>,
}

#[derive(Debug, Deserialize)]
struct PhotoRaw {
    urls: UrlsBlock,
    user: Option<UserBlock>,
}

#[derive(Debug, Deserialize)]
struct UrlsBlock {
    regular: String,
}

#[derive(Debug, Deserialize)]
struct UserBlock {
    #[serde(default)]
    name: Option<String>,
    links: Option<UserLinks>,
}

#[derive(Debug, Deserialize)]
struct UserLinks {
    #[serde(default)]
    html: Option<String>,
}

// ============================================================================
// Public types
// ============================================================================

/// A city photo with the attribution Unsplash requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityPhoto {
    pub image_url: String,
    pub photographer: Option<String>,
    pub profile_url: Option<String>,
}

/// A photo plus its fetch time, as stored in the in-memory cache.
#[derive(Debug, Clone)]
pub struct CachedPhoto {
    pub photo: CityPhoto,
    pub fetched_at: DateTime<Utc>,
}

impl CachedPhoto {
    pub fn new(photo: CityPhoto) -> Self {
        Self {
            photo,
            fetched_at: Utc::now(),
        }
    }

    pub fn fresh_at(&self, now: DateTime<Utc>) -> bool {
        now - self.fetched_at < Duration::hours(PHOTO_CACHE_TTL_HOURS)
    }
}

/// In-memory cache key for a city.
pub fn cache_key(city: &str) -> String {
    format!("city-{}", city)
}

/// Search Unsplash for a landscape photo of the city.
///
/// `Ok(None)` when the search has no results.
pub async fn fetch_city_photo(
    client: &reqwest::Client,
    api_key: &str,
    city: &str,
) -> Result<Option<CityPhoto>, WidgetError> {
    let response = client
        .get(SEARCH_ENDPOINT)
        .header("Authorization", format!("Client-ID {}", api_key))
        .query(&[
            ("query", city),
            ("per_page", "1"),
            ("orientation", "landscape"),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(WidgetError::Unavailable(format!(
            "photo service returned {}: {}",
            status, body
        )));
    }

    let mut raw: SearchResponse = response
        .json()
        .await
        .map_err(|e| WidgetError::Invalid(format!("photo payload: {}", e)))?;
    if raw.results.is_empty() {
        return Ok(None);
    }
    let first = raw.results.remove(0);
    Ok(Some(CityPhoto {
        image_url: first.urls.regular,
        photographer: first.user.as_ref().and_then(|u| u.name.clone()),
        profile_url: first
            .user
            .and_then(|u| u.links)
            .and_then(|l| l.html),
    }))
}

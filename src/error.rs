//! Widget error taxonomy.
//!
//! Every failure a widget can hit — data-source reads, enrichment calls,
//! malformed records — is normalized into one of four members before it
//! reaches display logic:
//! - NotConfigured: a required credential is missing; fatal to that widget only
//! - NotFound: no matching record; rendered as an empty state, not an error
//! - Unavailable: network/service failure; triggers the stale-cache fallback
//! - Invalid: a malformed field; rendered as an "N/A" placeholder

use thiserror::Error;

use crate::source::SourceError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WidgetError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("No matching record")]
    NotFound,

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid field: {0}")]
    Invalid(String),
}

impl WidgetError {
    /// Recoverable errors are eligible for the stale-cache fallback.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WidgetError::Unavailable(_))
    }

    /// True when the widget should render an empty state rather than an error.
    pub fn is_empty_state(&self) -> bool {
        matches!(self, WidgetError::NotFound)
    }

    /// User-visible message for the widget body.
    pub fn user_message(&self) -> String {
        match self {
            WidgetError::NotConfigured(what) => {
                format!("{} is not set up. Add the key in Settings.", what)
            }
            WidgetError::NotFound => "Nothing coming up.".to_string(),
            WidgetError::Unavailable(reason) => format!("Couldn't refresh: {}", reason),
            WidgetError::Invalid(field) => format!("Some details are missing ({})", field),
        }
    }
}

impl From<SourceError> for WidgetError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotConfigured(what) => WidgetError::NotConfigured(what),
            SourceError::Decode(msg) => WidgetError::Invalid(msg),
            SourceError::Http(msg) | SourceError::Api { message: msg, .. } => {
                WidgetError::Unavailable(msg)
            }
        }
    }
}

/// Timeouts are treated identically to network failures.
impl From<reqwest::Error> for WidgetError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WidgetError::Unavailable("request timed out".to_string())
        } else {
            WidgetError::Unavailable(err.to_string())
        }
    }
}

//! Hotel widget loader.
//!
//! No enrichment and no validation: the card shows the stored dates
//! literally, even when check-in sorts after check-out — the display layer
//! enforces no invariant the source doesn't.

use serde::Serialize;

use crate::error::WidgetError;
use crate::loader::WidgetState;
use crate::queries;
use crate::source::RemoteSource;
use crate::state::AppState;
use crate::types::{self, Accommodation, NOT_AVAILABLE};

pub const DOMAIN: &str = "hotel";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelCard {
    pub name: String,
    pub address: String,
    pub check_in: String,
    pub check_out: String,
    pub confirmation_number: String,
    pub phone: String,
}

fn text_or_na(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn card(accommodation: &Accommodation) -> HotelCard {
    HotelCard {
        name: text_or_na(accommodation.name.as_deref()),
        address: text_or_na(accommodation.address.as_deref()),
        check_in: types::format_day(accommodation.check_in.as_deref()),
        check_out: types::format_day(accommodation.check_out.as_deref()),
        confirmation_number: text_or_na(accommodation.confirmation_number.as_deref()),
        phone: text_or_na(accommodation.phone.as_deref()),
    }
}

/// Load the hotel widget: the soonest stay by check-in.
pub async fn load(_app: &AppState, source: &dyn RemoteSource) -> WidgetState<HotelCard> {
    match queries::next_accommodation(source).await {
        Ok(Some(accommodation)) => WidgetState::fresh(card(&accommodation)),
        Ok(None) => WidgetState::Errored(WidgetError::NotFound),
        Err(e) => WidgetState::Errored(e),
    }
}

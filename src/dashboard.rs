//! Dashboard aggregator.
//!
//! Owns the ordered widget groups, one refresh cell per widget, and the
//! global interaction state: the initializing phase, the pull-to-refresh
//! gate, and edit mode. Widget fetches run concurrently and settle
//! independently — one widget's failure never blanks another.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};

use crate::enrichment::weather::WeatherReport;
use crate::layout::Layout;
use crate::loader::LoaderCell;
use crate::queries;
use crate::source::RemoteSource;
use crate::state::AppState;
use crate::widgets::city_photo::CityPhotoCard;
use crate::widgets::flight::FlightCard;
use crate::widgets::hotel::HotelCard;
use crate::widgets::{self, WidgetGroup, WidgetKind};

/// Downward drag distance that arms pull-to-refresh.
pub const PULL_THRESHOLD_PX: f32 = 50.0;

/// Minimum visible duration of one refreshing indication; triggers inside
/// this window are swallowed so a single gesture can't stack passes.
pub const MIN_REFRESH_VISIBLE: Duration = Duration::from_millis(500);

/// Greeting for a local hour: 05–11 morning, 12–17 afternoon, else evening.
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

/// Resolve the name the header greets. Fallback chain: explicit first name,
/// first token of the full name, then a generic placeholder — a failed
/// profile lookup must not block the dashboard.
pub async fn resolve_display_name(source: &dyn RemoteSource) -> String {
    let prefs = match queries::user_preferences(source).await {
        Ok(Some(prefs)) => prefs,
        _ => return "there".to_string(),
    };
    if let Some(first) = prefs.first_name.filter(|n| !n.trim().is_empty()) {
        return first.trim().to_string();
    }
    if let Some(full) = prefs.full_name {
        if let Some(first) = full.split_whitespace().next() {
            return first.to_string();
        }
    }
    "there".to_string()
}

/// Debounce gate for pull-to-refresh.
#[derive(Debug, Default)]
pub struct RefreshGate {
    refreshing: bool,
    started: Option<Instant>,
}

impl RefreshGate {
    /// Arm a refresh pass. Refused while one runs, or within the minimum
    /// visible window of the last one.
    pub fn try_begin(&mut self, now: Instant) -> bool {
        if self.refreshing {
            return false;
        }
        if let Some(started) = self.started {
            if now.duration_since(started) < MIN_REFRESH_VISIBLE {
                return false;
            }
        }
        self.refreshing = true;
        self.started = Some(now);
        true
    }

    pub fn finish(&mut self) {
        self.refreshing = false;
    }

    /// Whether the UI should show the refreshing indicator.
    pub fn is_visible(&self, now: Instant) -> bool {
        if self.refreshing {
            return true;
        }
        self.started
            .map(|s| now.duration_since(s) < MIN_REFRESH_VISIBLE)
            .unwrap_or(false)
    }
}

pub struct Dashboard {
    app: Arc<AppState>,
    source: Arc<dyn RemoteSource>,

    pub flight: LoaderCell<FlightCard>,
    pub hotel: LoaderCell<HotelCard>,
    pub weather: LoaderCell<WeatherReport>,
    pub city_photo: LoaderCell<CityPhotoCard>,

    layout: Mutex<Layout>,
    gate: Mutex<RefreshGate>,
    /// Greeting is fixed at mount, not recomputed on a running clock.
    greeting: &'static str,
    /// None until initialization resolves an identity.
    display_name: RwLock<Option<String>>,
}

impl Dashboard {
    pub fn new(app: Arc<AppState>, source: Arc<dyn RemoteSource>) -> Self {
        use chrono::Timelike;
        Self {
            app,
            source,
            flight: LoaderCell::new(),
            hotel: LoaderCell::new(),
            weather: LoaderCell::new(),
            city_photo: LoaderCell::new(),
            layout: Mutex::new(Layout::default()),
            gate: Mutex::new(RefreshGate::default()),
            greeting: greeting_for_hour(chrono::Local::now().hour()),
            display_name: RwLock::new(None),
        }
    }

    pub fn app_state(&self) -> &Arc<AppState> {
        &self.app
    }

    // ------------------------------------------------------------------
    // Initialization
    // ------------------------------------------------------------------

    /// Resolve the user's identity and leave the initializing phase. Until
    /// this returns, callers render a loading indicator only — no stale
    /// widget content.
    pub async fn initialize(&self) {
        let name = resolve_display_name(self.source.as_ref()).await;
        *self.display_name.write() = Some(name);
        log::debug!("dashboard initialized");
    }

    pub fn is_initializing(&self) -> bool {
        self.display_name.read().is_none()
    }

    /// "Good morning, Jaden" header line; None while initializing.
    pub fn header(&self) -> Option<String> {
        self.display_name
            .read()
            .as_ref()
            .map(|name| format!("{}, {}", self.greeting, name))
    }

    // ------------------------------------------------------------------
    // Refresh
    // ------------------------------------------------------------------

    /// One refresh pass over every widget group. Fetches run concurrently;
    /// each result lands atomically through its cell's ticket.
    pub async fn refresh_all(&self) {
        let flight_ticket = self.flight.begin();
        let hotel_ticket = self.hotel.begin();
        let weather_ticket = self.weather.begin();
        let photo_ticket = self.city_photo.begin();

        let app = self.app.as_ref();
        let source = self.source.as_ref();
        let (flight, hotel, weather, photo) = tokio::join!(
            widgets::flight::load(app, source),
            widgets::hotel::load(app, source),
            widgets::weather::load(app, source),
            widgets::city_photo::load(app, source),
        );

        self.flight.apply(flight_ticket, flight);
        self.hotel.apply(hotel_ticket, hotel);
        self.weather.apply(weather_ticket, weather);
        self.city_photo.apply(photo_ticket, photo);
    }

    /// Pull-to-refresh entry point: `distance` is the downward drag in
    /// pixels. Returns true when a refresh pass actually ran.
    pub async fn on_pull(&self, distance: f32) -> bool {
        if distance < PULL_THRESHOLD_PX {
            return false;
        }
        if !self.gate.lock().try_begin(Instant::now()) {
            log::debug!("pull-to-refresh debounced");
            return false;
        }
        self.refresh_all().await;
        self.gate.lock().finish();
        true
    }

    pub fn is_refreshing(&self) -> bool {
        self.gate.lock().is_visible(Instant::now())
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Current groups in display order.
    pub fn groups(&self) -> Vec<WidgetGroup> {
        self.layout
            .lock()
            .order()
            .iter()
            .map(|&kind| kind.into())
            .collect()
    }

    pub fn set_edit_mode(&self, on: bool) {
        self.layout.lock().set_edit_mode(on);
    }

    pub fn edit_mode(&self) -> bool {
        self.layout.lock().edit_mode()
    }

    /// Drag-reorder a group; see `Layout::move_group`.
    pub fn move_group(&self, from: usize, to: usize) -> bool {
        self.layout.lock().move_group(from, to)
    }

    /// Route to navigate to when a group is selected. Pure side effect for
    /// the shell; aggregator state is untouched.
    pub fn select_group(&self, kind: WidgetKind) -> &'static str {
        kind.detail_route()
    }
}

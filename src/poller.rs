//! Background dashboard refresh poller.
//!
//! Runs as a long-lived async task: short startup delay, then a refresh
//! pass every `refresh_interval_minutes`. The interval is re-read from
//! shared config each cycle so settings changes apply without a restart.

use std::sync::Arc;
use std::time::Duration;

use crate::dashboard::Dashboard;

const STARTUP_DELAY: Duration = Duration::from_secs(10);

/// Sleep while polling is disabled before checking the config again.
const DISABLED_RECHECK: Duration = Duration::from_secs(300);

/// Background refresh poller.
///
/// - 10 s startup delay so the initial mount-time load lands first
/// - `refresh_interval_minutes = 0` disables the loop
/// - One `refresh_all` pass per cycle, then sleep the interval
pub async fn run_refresh_poller(dashboard: Arc<Dashboard>) {
    tokio::time::sleep(STARTUP_DELAY).await;

    loop {
        let interval_minutes = dashboard
            .app_state()
            .config_snapshot()
            .map(|c| c.refresh_interval_minutes)
            .unwrap_or(0);

        if interval_minutes == 0 {
            tokio::time::sleep(DISABLED_RECHECK).await;
            continue;
        }

        log::info!("refresh poller: starting pass");
        dashboard.refresh_all().await;
        log::info!(
            "refresh poller: pass complete, next in {} min",
            interval_minutes
        );

        tokio::time::sleep(Duration::from_secs(interval_minutes * 60)).await;
    }
}

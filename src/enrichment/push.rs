//! OneSignal push dispatch.

use serde_json::{json, Value};

use crate::config::PushConfig;
use crate::error::WidgetError;

const NOTIFICATIONS_ENDPOINT: &str = "https://onesignal.com/api/v1/notifications";

/// Request body for one notification to all subscribed devices.
fn payload(app_id: &str, title: &str, message: &str, target_url: Option<&str>) -> Value {
    let mut body = json!({
        "app_id": app_id,
        "headings": {"en": title},
        "contents": {"en": message},
        "included_segments": ["Subscribed Users"],
    });
    if let Some(url) = target_url {
        body["url"] = json!(url);
    }
    body
}

/// Send a push notification. Fire-and-forget: success is the service's ack.
pub async fn send_push(
    client: &reqwest::Client,
    config: &PushConfig,
    title: &str,
    message: &str,
    target_url: Option<&str>,
) -> Result<(), WidgetError> {
    let app_id = config
        .app_id
        .as_deref()
        .ok_or(WidgetError::NotConfigured("Push notifications"))?;
    let rest_key = config
        .rest_api_key
        .as_deref()
        .ok_or(WidgetError::NotConfigured("Push notifications"))?;

    let response = client
        .post(NOTIFICATIONS_ENDPOINT)
        .header("Authorization", format!("Basic {}", rest_key))
        .json(&payload(app_id, title, message, target_url))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(WidgetError::Unavailable(format!(
            "push service returned {}: {}",
            status, body
        )));
    }
    Ok(())
}

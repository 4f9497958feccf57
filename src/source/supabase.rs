//! Supabase (PostgREST) implementation of `RemoteSource`.
//!
//! Rows go through `/rest/v1/{collection}` with PostgREST operators
//! (`order=`, `limit=`, `{field}=gte.{value}`); binary assets go through
//! `/storage/v1/object/{path}`. Both carry the anon key as `apikey` plus a
//! bearer token, matching how the original client talked to the backend.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::{Filter, Order, RemoteSource, SourceError, SourceQuery};

pub struct SupabaseSource {
    base: Url,
    api_key: String,
    client: reqwest::Client,
}

impl SupabaseSource {
    pub fn new(base_url: &str, api_key: &str, client: reqwest::Client) -> Result<Self, SourceError> {
        let base = Url::parse(base_url)
            .map_err(|e| SourceError::Decode(format!("bad source url: {}", e)))?;
        Ok(Self {
            base,
            api_key: api_key.to_string(),
            client,
        })
    }

    /// Build one from config; absent endpoint or key is `NotConfigured`.
    pub fn from_config(
        config: &crate::config::SourceConfig,
        client: reqwest::Client,
    ) -> Result<Self, SourceError> {
        let url = config
            .url
            .as_deref()
            .ok_or(SourceError::NotConfigured("Data source"))?;
        let key = config
            .api_key
            .as_deref()
            .ok_or(SourceError::NotConfigured("Data source"))?;
        Self::new(url, key, client)
    }

    fn rest_url(&self, collection: &str) -> Result<Url, SourceError> {
        self.base
            .join(&format!("rest/v1/{}", collection))
            .map_err(|e| SourceError::Decode(e.to_string()))
    }

    fn storage_url(&self, path: &str) -> Result<Url, SourceError> {
        self.base
            .join(&format!("storage/v1/object/{}", path.trim_start_matches('/')))
            .map_err(|e| SourceError::Decode(e.to_string()))
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

/// PostgREST literal for a JSON value (strings unquoted, rest as JSON text).
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Query-string pairs for a read, in PostgREST syntax.
///
/// Ordered reads append `id.asc` as a secondary key — ties on the temporal
/// field must resolve the same way on every refresh.
pub(crate) fn query_params(query: &SourceQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    for filter in &query.filters {
        let (field, op, value) = match filter {
            Filter::Eq(field, value) => (field, "eq", value),
            Filter::Gte(field, value) => (field, "gte", value),
            Filter::Gt(field, value) => (field, "gt", value),
        };
        params.push((field.to_string(), format!("{}.{}", op, literal(value))));
    }
    if let Some((field, order)) = query.order_by {
        let direction = match order {
            Order::Ascending => "asc",
            Order::Descending => "desc",
        };
        params.push(("order".to_string(), format!("{}.{},id.asc", field, direction)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(SourceError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RemoteSource for SupabaseSource {
    async fn read(&self, query: &SourceQuery) -> Result<Vec<Value>, SourceError> {
        let url = self.rest_url(query.collection)?;
        let response = self
            .authed(self.client.get(url).query(&query_params(query)))
            .send()
            .await?;
        let rows: Vec<Value> = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;
        Ok(rows)
    }

    async fn insert(&self, collection: &str, record: Value) -> Result<Value, SourceError> {
        let url = self.rest_url(collection)?;
        let response = self
            .authed(self.client.post(url))
            .header("Prefer", "return=representation")
            .json(&[record])
            .send()
            .await?;
        let mut rows: Vec<Value> = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;
        rows.pop()
            .ok_or_else(|| SourceError::Decode("insert returned no row".to_string()))
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        partial: Value,
    ) -> Result<(), SourceError> {
        let url = self.rest_url(collection)?;
        let response = self
            .authed(
                self.client
                    .patch(url)
                    .query(&[("id", format!("eq.{}", key))]),
            )
            .json(&partial)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), SourceError> {
        let url = self.rest_url(collection)?;
        let response = self
            .authed(
                self.client
                    .delete(url)
                    .query(&[("id", format!("eq.{}", key))]),
            )
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn upload_file(&self, path: &str, bytes: Vec<u8>) -> Result<(), SourceError> {
        let url = self.storage_url(path)?;
        let response = self
            .authed(self.client.post(url))
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn download_file(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        let url = self.storage_url(path)?;
        let response = self.authed(self.client.get(url)).send().await?;
        let bytes = check_status(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

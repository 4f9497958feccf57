//! In-memory `RemoteSource` used across the crate's tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::source::{Filter, Order, RemoteSource, SourceError, SourceQuery};

#[derive(Default)]
pub struct MemorySource {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    fail_reads: AtomicBool,
    failing_collections: Mutex<HashSet<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(collection: &str, rows: Vec<Value>) -> Self {
        let source = Self::new();
        source.seed(collection, rows);
        source
    }

    pub fn seed(&self, collection: &str, rows: Vec<Value>) {
        self.tables.lock().insert(collection.to_string(), rows);
    }

    /// All subsequent reads fail with an API error (service outage).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Reads against one collection fail; the rest keep working.
    pub fn fail_collection(&self, collection: &str) {
        self.failing_collections
            .lock()
            .insert(collection.to_string());
    }

    pub fn rows(&self, collection: &str) -> Vec<Value> {
        self.tables
            .lock()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

fn field_str(row: &Value, field: &str) -> String {
    match row.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches(row: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(field, value) => row.get(*field) == Some(value),
        Filter::Gte(field, value) => field_str(row, field) >= literal(value),
        Filter::Gt(field, value) => field_str(row, field) > literal(value),
    }
}

#[async_trait]
impl RemoteSource for MemorySource {
    async fn read(&self, query: &SourceQuery) -> Result<Vec<Value>, SourceError> {
        if self.fail_reads.load(Ordering::SeqCst)
            || self.failing_collections.lock().contains(query.collection)
        {
            return Err(SourceError::Api {
                status: 503,
                message: "simulated outage".to_string(),
            });
        }
        let mut rows: Vec<Value> = self
            .rows(query.collection)
            .into_iter()
            .filter(|row| query.filters.iter().all(|f| matches(row, f)))
            .collect();
        if let Some((field, order)) = query.order_by {
            // Primary on the requested field, secondary on id: deterministic ties.
            rows.sort_by(|a, b| {
                let cmp = field_str(a, field).cmp(&field_str(b, field));
                let cmp = if order == Order::Descending {
                    cmp.reverse()
                } else {
                    cmp
                };
                cmp.then_with(|| field_str(a, "id").cmp(&field_str(b, "id")))
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(&self, collection: &str, record: Value) -> Result<Value, SourceError> {
        self.tables
            .lock()
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        partial: Value,
    ) -> Result<(), SourceError> {
        let mut tables = self.tables.lock();
        let rows = tables.entry(collection.to_string()).or_default();
        for row in rows.iter_mut() {
            if field_str(row, "id") == key {
                if let (Some(target), Some(patch)) = (row.as_object_mut(), partial.as_object()) {
                    for (k, v) in patch {
                        target.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), SourceError> {
        let mut tables = self.tables.lock();
        if let Some(rows) = tables.get_mut(collection) {
            rows.retain(|row| field_str(row, "id") != key);
        }
        Ok(())
    }

    async fn upload_file(&self, path: &str, bytes: Vec<u8>) -> Result<(), SourceError> {
        self.files.lock().insert(path.to_string(), bytes);
        Ok(())
    }

    async fn download_file(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        self.files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::Api {
                status: 404,
                message: format!("no file at {}", path),
            })
    }
}

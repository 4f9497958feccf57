//! Generic remote data source interface.
//!
//! The hosted backend is a black box reached through `RemoteSource`: keyed
//! reads with equality/ordering filters, row writes, and binary asset
//! up/download. Rows travel as JSON values; the typed layer on top lives in
//! `crate::queries`.

pub mod supabase;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("HTTP: {0}")]
    Http(String),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Decode: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Http(err.to_string())
    }
}

/// Equality/ordering filters supported by the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(&'static str, Value),
    /// field >= value
    Gte(&'static str, Value),
    /// field > value
    Gt(&'static str, Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// A read request: collection, filters, ordering, row limit.
///
/// Ordered reads always carry `id` as a secondary ascending sort so that
/// ties on the temporal field resolve deterministically.
#[derive(Debug, Clone)]
pub struct SourceQuery {
    pub collection: &'static str,
    pub filters: Vec<Filter>,
    pub order_by: Option<(&'static str, Order)>,
    pub limit: Option<usize>,
}

impl SourceQuery {
    pub fn collection(collection: &'static str) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_ascending(mut self, field: &'static str) -> Self {
        self.order_by = Some((field, Order::Ascending));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Request/response interface over the hosted backend.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Read rows matching the query.
    async fn read(&self, query: &SourceQuery) -> Result<Vec<Value>, SourceError>;

    /// Insert a record, returning the created row.
    async fn insert(&self, collection: &str, record: Value) -> Result<Value, SourceError>;

    /// Apply a partial update to the record with the given key.
    async fn update(
        &self,
        collection: &str,
        key: &str,
        partial: Value,
    ) -> Result<(), SourceError>;

    /// Delete the record with the given key.
    async fn delete(&self, collection: &str, key: &str) -> Result<(), SourceError>;

    /// Upload a binary asset (itinerary PDFs, avatars) to a storage path.
    async fn upload_file(&self, path: &str, bytes: Vec<u8>) -> Result<(), SourceError>;

    /// Download a binary asset by storage path.
    async fn download_file(&self, path: &str) -> Result<Vec<u8>, SourceError>;
}

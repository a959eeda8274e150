//! Schema describe handlers
//!
//! [`SchemaService`] is what the RPC layer calls. The catalog comes from a
//! [`Persistence`] backend, and request headers are passed in explicitly so
//! keyspace-name decoration never depends on ambient per-request state.

use crate::config::SchemaConfig;
use crate::error::{Error, Result, Status, ValueSource};
use crate::schema::{
    describe_keyspace, describe_table, KeyspaceDescription, SchemaSnapshot, TableDescription,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Request metadata forwarded by the transport
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHeaders(BTreeMap<String, String>);

impl RequestHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Backing store seen by the describe handlers
pub trait Persistence: Send + Sync {
    /// Fetch the current catalog snapshot; may block, is never retried here
    fn schema(&self) -> Result<SchemaSnapshot>;

    /// Map a client-visible keyspace name to the stored one
    fn decorate_keyspace_name(&self, name: &str, _headers: &RequestHeaders) -> String {
        name.to_string()
    }
}

/// Persistence over a fixed snapshot, e.g. one loaded from a file
#[derive(Debug, Clone, Default)]
pub struct StaticPersistence {
    snapshot: SchemaSnapshot,
}

impl StaticPersistence {
    pub fn new(snapshot: SchemaSnapshot) -> Self {
        Self { snapshot }
    }
}

impl Persistence for StaticPersistence {
    fn schema(&self) -> Result<SchemaSnapshot> {
        Ok(self.snapshot.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribeKeyspaceQuery {
    pub keyspace_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribeTableQuery {
    pub keyspace_name: String,
    pub table_name: String,
}

/// Describe entry points returning client-facing statuses
#[derive(Clone)]
pub struct SchemaService {
    persistence: Arc<dyn Persistence>,
    config: SchemaConfig,
}

impl SchemaService {
    pub fn new(persistence: Arc<dyn Persistence>, config: SchemaConfig) -> Self {
        Self {
            persistence,
            config,
        }
    }

    pub fn describe_keyspace(
        &self,
        query: &DescribeKeyspaceQuery,
        headers: &RequestHeaders,
    ) -> std::result::Result<KeyspaceDescription, Status> {
        let keyspace = self
            .persistence
            .decorate_keyspace_name(&query.keyspace_name, headers);
        let snapshot = self.snapshot()?;
        describe_keyspace(&keyspace, &snapshot, &self.config).map_err(into_status)
    }

    pub fn describe_table(
        &self,
        query: &DescribeTableQuery,
        headers: &RequestHeaders,
    ) -> std::result::Result<TableDescription, Status> {
        let keyspace = self
            .persistence
            .decorate_keyspace_name(&query.keyspace_name, headers);
        let snapshot = self.snapshot()?;
        describe_table(&keyspace, &query.table_name, &snapshot).map_err(into_status)
    }

    fn snapshot(&self) -> std::result::Result<SchemaSnapshot, Status> {
        self.persistence.schema().map_err(|e| {
            log::error!("Failed to fetch catalog snapshot: {}", e);
            into_status(e)
        })
    }
}

impl std::fmt::Debug for SchemaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// Catalog data is never client-supplied bytes
fn into_status(err: Error) -> Status {
    err.to_status(ValueSource::Store)
}

//! Catalog model and schema descriptions
//!
//! A [`SchemaSnapshot`] is the caller-supplied, immutable view of the live
//! catalog. [`describe_keyspace`] and [`describe_table`] render it into the
//! nested description trees handed back to gateway clients.

pub mod describe;
pub mod parser;
pub mod table;

pub use describe::{
    describe_keyspace, describe_table, KeyspaceDescription, KeyspaceOptions,
};
pub use parser::parse_column_type;
pub use table::{
    ColumnSpec, IndexDescription, MaterializedViewDescription, TableDescription,
};

use crate::types::{ColumnType, UserDefinedType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Role of a column within its table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    PartitionKey,
    Clustering,
    Static,
    #[default]
    Regular,
}

/// Catalog column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,

    #[serde(rename = "type")]
    pub column_type: ColumnType,

    #[serde(default)]
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: impl Into<ColumnType>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            kind,
        }
    }

    pub fn regular(name: impl Into<String>, column_type: impl Into<ColumnType>) -> Self {
        Self::new(name, column_type, ColumnKind::Regular)
    }

    pub fn static_column(name: impl Into<String>, column_type: impl Into<ColumnType>) -> Self {
        Self::new(name, column_type, ColumnKind::Static)
    }
}

/// Clustering order of a clustering column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClusteringOrder {
    #[default]
    Asc,
    Desc,
}

/// Clustering column with its order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusteringColumn {
    pub name: String,

    #[serde(rename = "type")]
    pub column_type: ColumnType,

    #[serde(default)]
    pub order: ClusteringOrder,
}

/// Secondary index on a single column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryIndex {
    pub name: String,

    /// Target column name
    pub column: String,

    /// Implementation class for custom (non built-in) indexes
    #[serde(default)]
    pub custom_class: Option<String>,
}

/// Materialized view over its base table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializedView {
    pub name: String,

    pub partition_key_columns: Vec<Column>,

    #[serde(default)]
    pub clustering_key_columns: Vec<ClusteringColumn>,

    /// Non-key columns
    #[serde(default)]
    pub columns: Vec<Column>,
}

/// Anything attached to a table's index list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "index_type", rename_all = "snake_case")]
pub enum Index {
    Secondary(SecondaryIndex),
    MaterializedView(MaterializedView),
}

/// Catalog table definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,

    pub partition_key_columns: Vec<Column>,

    #[serde(default)]
    pub clustering_key_columns: Vec<ClusteringColumn>,

    /// Static and regular columns, told apart by [`Column::kind`]
    #[serde(default)]
    pub columns: Vec<Column>,

    #[serde(default)]
    pub indexes: Vec<Index>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            partition_key_columns: Vec::new(),
            clustering_key_columns: Vec::new(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn with_partition_key(mut self, name: impl Into<String>, column_type: impl Into<ColumnType>) -> Self {
        self.partition_key_columns
            .push(Column::new(name, column_type, ColumnKind::PartitionKey));
        self
    }

    pub fn with_clustering_key(
        mut self,
        name: impl Into<String>,
        column_type: impl Into<ColumnType>,
        order: ClusteringOrder,
    ) -> Self {
        self.clustering_key_columns.push(ClusteringColumn {
            name: name.into(),
            column_type: column_type.into(),
            order,
        });
        self
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }
}

/// Catalog keyspace definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyspace {
    pub name: String,

    /// Raw replication options, including the `class` entry
    #[serde(default)]
    pub replication: BTreeMap<String, String>,

    /// Only set when the catalog recorded an explicit value
    #[serde(default)]
    pub durable_writes: Option<bool>,

    #[serde(default)]
    pub user_types: Vec<UserDefinedType>,

    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Keyspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replication: BTreeMap::new(),
            durable_writes: None,
            user_types: Vec::new(),
            tables: Vec::new(),
        }
    }

    pub fn with_replication<K, V>(mut self, options: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.replication = options
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn with_durable_writes(mut self, durable_writes: bool) -> Self {
        self.durable_writes = Some(durable_writes);
        self
    }

    pub fn with_user_type(mut self, udt: UserDefinedType) -> Self {
        self.user_types.push(udt);
        self
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn user_type(&self, name: &str) -> Option<&UserDefinedType> {
        self.user_types.iter().find(|t| t.name == name)
    }
}

/// Read-only catalog lookups
pub trait Catalog {
    fn keyspace(&self, name: &str) -> Option<&Keyspace>;

    fn table(&self, keyspace: &str, name: &str) -> Option<&Table> {
        self.keyspace(keyspace).and_then(|ks| ks.table(name))
    }
}

/// Immutable snapshot of the live catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub keyspaces: Vec<Keyspace>,
}

impl SchemaSnapshot {
    pub fn new(keyspaces: Vec<Keyspace>) -> Self {
        Self { keyspaces }
    }

    /// Parse a snapshot from its JSON form
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::Error::catalog(format!("Invalid catalog snapshot: {}", e)))
    }
}

impl Catalog for SchemaSnapshot {
    fn keyspace(&self, name: &str) -> Option<&Keyspace> {
        self.keyspaces.iter().find(|ks| ks.name == name)
    }
}

//! Table and materialized view descriptions
//!
//! Tables and views share one layout builder. Columns come out in a fixed
//! order: partition key, clustering key, static, regular. Every column type
//! is passed through [`translate`].

use super::{
    ClusteringColumn, ClusteringOrder, Column, ColumnKind, Index, MaterializedView,
    SecondaryIndex, Table,
};
use crate::translator::{translate, TypeSpec};
use serde::Serialize;
use std::collections::BTreeMap;

/// Column name with its wire type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_spec: TypeSpec,
}

impl From<&Column> for ColumnSpec {
    fn from(column: &Column) -> Self {
        Self {
            name: column.name.clone(),
            type_spec: translate(&column.column_type),
        }
    }
}

impl From<&ClusteringColumn> for ColumnSpec {
    fn from(column: &ClusteringColumn) -> Self {
        Self {
            name: column.name.clone(),
            type_spec: translate(&column.column_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexDescription {
    pub name: String,
    pub column_name: String,
    /// Implementation class of a custom index; absent for built-in indexes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_type: Option<String>,
}

impl From<&SecondaryIndex> for IndexDescription {
    fn from(index: &SecondaryIndex) -> Self {
        Self {
            name: index.name.clone(),
            column_name: index.column.clone(),
            custom_type: index.custom_class.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterializedViewDescription {
    pub name: String,
    pub partition_key_columns: Vec<ColumnSpec>,
    pub clustering_key_columns: Vec<ColumnSpec>,
    pub columns: Vec<ColumnSpec>,
    pub clustering_orders: BTreeMap<String, ClusteringOrder>,
    /// Always empty: the catalog exposes no view options
    pub options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDescription {
    pub name: String,
    pub partition_key_columns: Vec<ColumnSpec>,
    pub clustering_key_columns: Vec<ColumnSpec>,
    pub static_columns: Vec<ColumnSpec>,
    pub columns: Vec<ColumnSpec>,
    pub clustering_orders: BTreeMap<String, ClusteringOrder>,
    pub indexes: Vec<IndexDescription>,
    pub materialized_views: Vec<MaterializedViewDescription>,
    /// Always empty: the catalog exposes no table options
    pub options: BTreeMap<String, String>,
}

impl TableDescription {
    /// Every column spec in emission order
    pub fn all_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.partition_key_columns
            .iter()
            .chain(&self.clustering_key_columns)
            .chain(&self.static_columns)
            .chain(&self.columns)
    }
}

/// Key columns shared by tables and views
struct KeyLayout {
    partition_key_columns: Vec<ColumnSpec>,
    clustering_key_columns: Vec<ColumnSpec>,
    clustering_orders: BTreeMap<String, ClusteringOrder>,
}

impl KeyLayout {
    fn build(partition_key: &[Column], clustering_key: &[ClusteringColumn]) -> Self {
        Self {
            partition_key_columns: partition_key.iter().map(ColumnSpec::from).collect(),
            clustering_key_columns: clustering_key.iter().map(ColumnSpec::from).collect(),
            clustering_orders: clustering_key
                .iter()
                .map(|c| (c.name.clone(), c.order))
                .collect(),
        }
    }
}

/// Describe a table, its indexes and its materialized views
pub fn build_table(table: &Table) -> TableDescription {
    log::trace!("Building description for table {}", table.name);

    let keys = KeyLayout::build(&table.partition_key_columns, &table.clustering_key_columns);
    for column in &table.columns {
        if matches!(column.kind, ColumnKind::PartitionKey | ColumnKind::Clustering) {
            log::warn!(
                "Column {}.{} is marked {:?} but listed with non-key columns; describing it as regular",
                table.name,
                column.name,
                column.kind
            );
        }
    }
    let (static_columns, columns): (Vec<&Column>, Vec<&Column>) = table
        .columns
        .iter()
        .partition(|c| c.kind == ColumnKind::Static);

    let mut indexes = Vec::new();
    let mut materialized_views = Vec::new();
    for index in &table.indexes {
        match index {
            Index::Secondary(secondary) => indexes.push(IndexDescription::from(secondary)),
            Index::MaterializedView(view) => materialized_views.push(build_view(view)),
        }
    }

    TableDescription {
        name: table.name.clone(),
        partition_key_columns: keys.partition_key_columns,
        clustering_key_columns: keys.clustering_key_columns,
        static_columns: static_columns.into_iter().map(ColumnSpec::from).collect(),
        columns: columns.into_iter().map(ColumnSpec::from).collect(),
        clustering_orders: keys.clustering_orders,
        indexes,
        materialized_views,
        options: BTreeMap::new(),
    }
}

/// Describe a view; all of its non-key columns are emitted as regular
pub fn build_view(view: &MaterializedView) -> MaterializedViewDescription {
    let keys = KeyLayout::build(&view.partition_key_columns, &view.clustering_key_columns);
    MaterializedViewDescription {
        name: view.name.clone(),
        partition_key_columns: keys.partition_key_columns,
        clustering_key_columns: keys.clustering_key_columns,
        columns: view.columns.iter().map(ColumnSpec::from).collect(),
        clustering_orders: keys.clustering_orders,
        options: BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnType, PrimitiveType};

    fn events_table() -> Table {
        Table::new("events")
            .with_partition_key("tenant", PrimitiveType::Text)
            .with_partition_key("day", PrimitiveType::Date)
            .with_clustering_key("b", PrimitiveType::Int, ClusteringOrder::Desc)
            .with_clustering_key("a", PrimitiveType::Int, ClusteringOrder::Asc)
            .with_column(Column::regular("payload", PrimitiveType::Blob))
            .with_column(Column::static_column("owner", PrimitiveType::Text))
            .with_column(Column::regular("tags", ColumnType::set(PrimitiveType::Text)))
    }

    fn names(specs: &[ColumnSpec]) -> Vec<&str> {
        specs.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_clustering_order_preserved() {
        let desc = build_table(&events_table());
        assert_eq!(names(&desc.clustering_key_columns), vec!["b", "a"]);
        assert_eq!(desc.clustering_orders["b"], ClusteringOrder::Desc);
        assert_eq!(desc.clustering_orders["a"], ClusteringOrder::Asc);
        assert_eq!(desc.clustering_orders.len(), 2);
    }

    #[test]
    fn test_static_split_by_kind() {
        let desc = build_table(&events_table());
        assert_eq!(names(&desc.partition_key_columns), vec!["tenant", "day"]);
        assert_eq!(names(&desc.static_columns), vec!["owner"]);
        assert_eq!(names(&desc.columns), vec!["payload", "tags"]);

        let order: Vec<_> = desc.all_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(order, vec!["tenant", "day", "b", "a", "owner", "payload", "tags"]);
        assert_eq!(desc.columns[1].type_spec.to_string(), "set<text>");
    }

    #[test]
    fn test_key_kind_in_non_key_columns_described_as_regular() {
        let table = events_table().with_column(Column::new(
            "stray",
            PrimitiveType::Int,
            ColumnKind::PartitionKey,
        ));
        let desc = build_table(&table);
        assert_eq!(names(&desc.partition_key_columns), vec!["tenant", "day"]);
        assert_eq!(names(&desc.columns), vec!["payload", "tags", "stray"]);
    }

    #[test]
    fn test_indexes_and_views() {
        let table = events_table()
            .with_index(Index::Secondary(SecondaryIndex {
                name: "by_payload".into(),
                column: "payload".into(),
                custom_class: None,
            }))
            .with_index(Index::Secondary(SecondaryIndex {
                name: "tags_sai".into(),
                column: "tags".into(),
                custom_class: Some("StorageAttachedIndex".into()),
            }))
            .with_index(Index::MaterializedView(MaterializedView {
                name: "events_by_owner".into(),
                partition_key_columns: vec![Column::new(
                    "owner",
                    PrimitiveType::Text,
                    ColumnKind::PartitionKey,
                )],
                clustering_key_columns: vec![],
                columns: vec![
                    Column::static_column("tenant", PrimitiveType::Text),
                    Column::regular("payload", PrimitiveType::Blob),
                ],
            }));

        let desc = build_table(&table);
        assert_eq!(desc.indexes.len(), 2);
        assert_eq!(desc.indexes[0].custom_type, None);
        assert_eq!(
            desc.indexes[1].custom_type.as_deref(),
            Some("StorageAttachedIndex")
        );

        let view = &desc.materialized_views[0];
        assert_eq!(names(&view.columns), vec!["tenant", "payload"]);
        assert!(view.options.is_empty());
        assert!(desc.options.is_empty());
    }
}

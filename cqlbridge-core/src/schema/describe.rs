//! Keyspace and table descriptions

use super::table::{build_table, TableDescription};
use super::{Catalog, Keyspace};
use crate::config::{SchemaConfig, SimpleStrategyFactor};
use crate::error::{Error, Result};
use crate::translator::{translate_udt, UdtSpec};
use serde::Serialize;
use std::collections::BTreeMap;

const SIMPLE_STRATEGY: &str = "SimpleStrategy";
const NETWORK_TOPOLOGY_STRATEGY: &str = "NetworkTopologyStrategy";

/// Keyspace name plus its rendered options
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyspaceOptions {
    pub name: String,
    /// `replication` and `durable_writes`, when known
    pub options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyspaceDescription {
    pub keyspace: KeyspaceOptions,
    pub types: Vec<UdtSpec>,
    pub tables: Vec<TableDescription>,
}

/// Describe a keyspace, its user-defined types and its tables
pub fn describe_keyspace(
    name: &str,
    catalog: &dyn Catalog,
    config: &SchemaConfig,
) -> Result<KeyspaceDescription> {
    log::debug!("Describing keyspace {}", name);

    let keyspace = catalog
        .keyspace(name)
        .ok_or_else(|| Error::keyspace_not_found(name))?;

    let mut options = BTreeMap::new();
    if let Some(replication) = render_replication(keyspace, config)? {
        options.insert("replication".to_string(), replication);
    }
    if let Some(durable_writes) = keyspace.durable_writes {
        options.insert("durable_writes".to_string(), durable_writes.to_string());
    }

    let types = keyspace
        .user_types
        .iter()
        .map(translate_udt)
        .collect();

    Ok(KeyspaceDescription {
        keyspace: KeyspaceOptions {
            name: keyspace.name.clone(),
            options,
        },
        types,
        tables: keyspace.tables.iter().map(build_table).collect(),
    })
}

/// Describe a single table; keyspace and table absence fail differently
pub fn describe_table(
    keyspace: &str,
    table_name: &str,
    catalog: &dyn Catalog,
) -> Result<TableDescription> {
    log::debug!("Describing table {}.{}", keyspace, table_name);

    let table = catalog
        .keyspace(keyspace)
        .ok_or_else(|| Error::keyspace_not_found(keyspace))?
        .table(table_name)
        .ok_or_else(|| Error::table_not_found(keyspace, table_name))?;
    Ok(build_table(table))
}

/// Simple class name of a replication strategy
fn strategy_name(class: &str) -> &str {
    class.rsplit('.').next().unwrap_or(class)
}

/// Render the replication option for a keyspace, if its strategy is known
fn render_replication(keyspace: &Keyspace, config: &SchemaConfig) -> Result<Option<String>> {
    let Some(class) = keyspace.replication.get("class") else {
        return Ok(None);
    };

    match strategy_name(class) {
        SIMPLE_STRATEGY => {
            let factor = match config.simple_strategy_factor {
                SimpleStrategyFactor::Fixed => 1,
                SimpleStrategyFactor::Stored => keyspace
                    .replication
                    .get("replication_factor")
                    .map(|v| parse_factor(keyspace, "replication_factor", v))
                    .transpose()?
                    .unwrap_or(1),
            };
            Ok(Some(format!(
                "{{'class': '{}', 'replication_factor': {}}}",
                SIMPLE_STRATEGY, factor
            )))
        }
        NETWORK_TOPOLOGY_STRATEGY => {
            let mut rendered = format!("{{'class': '{}'", NETWORK_TOPOLOGY_STRATEGY);
            for (datacenter, value) in &keyspace.replication {
                if datacenter == "class" {
                    continue;
                }
                let factor = parse_factor(keyspace, datacenter, value)?;
                rendered.push_str(&format!(", '{}': {}", datacenter, factor));
            }
            rendered.push('}');
            Ok(Some(rendered))
        }
        other => {
            log::warn!(
                "Keyspace {} uses unrecognized replication strategy {}; omitting replication option",
                keyspace.name,
                other
            );
            Ok(None)
        }
    }
}

fn parse_factor(keyspace: &Keyspace, option: &str, value: &str) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|_| {
        Error::invalid_replication(
            &keyspace.name,
            format!("{} has non-integer replication factor '{}'", option, value),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ClusteringOrder, SchemaSnapshot, Table};
    use crate::types::{PrimitiveType, UserDefinedType};

    fn snapshot() -> SchemaSnapshot {
        SchemaSnapshot::new(vec![
            Keyspace::new("simple")
                .with_replication([("class", "SimpleStrategy"), ("replication_factor", "3")])
                .with_durable_writes(true)
                .with_user_type(
                    UserDefinedType::new("address")
                        .with_field("street", PrimitiveType::Text)
                        .with_field("zip", PrimitiveType::Int),
                )
                .with_table(
                    Table::new("users")
                        .with_partition_key("id", PrimitiveType::Uuid)
                        .with_clustering_key("at", PrimitiveType::Timestamp, ClusteringOrder::Desc),
                ),
            Keyspace::new("nts").with_replication([
                ("class", "org.apache.cassandra.locator.NetworkTopologyStrategy"),
                ("dc2", "2"),
                ("dc1", "3"),
            ]),
            Keyspace::new("local").with_replication([("class", "LocalStrategy")]),
        ])
    }

    #[test]
    fn test_simple_strategy_is_always_one() {
        let desc = describe_keyspace("simple", &snapshot(), &SchemaConfig::default()).unwrap();
        assert_eq!(
            desc.keyspace.options["replication"],
            "{'class': 'SimpleStrategy', 'replication_factor': 1}"
        );
        assert_eq!(desc.keyspace.options["durable_writes"], "true");
    }

    #[test]
    fn test_simple_strategy_stored_factor() {
        let config = SchemaConfig {
            simple_strategy_factor: SimpleStrategyFactor::Stored,
        };
        let desc = describe_keyspace("simple", &snapshot(), &config).unwrap();
        assert_eq!(
            desc.keyspace.options["replication"],
            "{'class': 'SimpleStrategy', 'replication_factor': 3}"
        );
    }

    #[test]
    fn test_network_topology_factors() {
        let desc = describe_keyspace("nts", &snapshot(), &SchemaConfig::default()).unwrap();
        assert_eq!(
            desc.keyspace.options["replication"],
            "{'class': 'NetworkTopologyStrategy', 'dc1': 3, 'dc2': 2}"
        );
        assert!(!desc.keyspace.options.contains_key("durable_writes"));
    }

    #[test]
    fn test_unknown_strategy_has_no_replication_option() {
        let desc = describe_keyspace("local", &snapshot(), &SchemaConfig::default()).unwrap();
        assert!(desc.keyspace.options.is_empty());
    }

    #[test]
    fn test_non_integer_factor_fails() {
        let catalog = SchemaSnapshot::new(vec![Keyspace::new("bad")
            .with_replication([("class", "NetworkTopologyStrategy"), ("dc1", "three")])]);
        let err = describe_keyspace("bad", &catalog, &SchemaConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidReplication { .. }));
    }

    #[test]
    fn test_types_and_tables() {
        let desc = describe_keyspace("simple", &snapshot(), &SchemaConfig::default()).unwrap();
        assert_eq!(desc.types.len(), 1);
        assert_eq!(desc.types[0].name, "address");
        assert_eq!(desc.types[0].fields[1].name, "zip");
        assert_eq!(desc.tables[0].name, "users");
    }

    #[test]
    fn test_not_found_is_two_stage() {
        let catalog = snapshot();
        assert_eq!(
            describe_table("missing", "users", &catalog).unwrap_err(),
            Error::keyspace_not_found("missing")
        );
        assert_eq!(
            describe_table("simple", "missing", &catalog).unwrap_err(),
            Error::table_not_found("simple", "missing")
        );
        assert!(describe_table("simple", "users", &catalog).is_ok());
    }
}

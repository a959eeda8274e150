use super::{load_catalog, print_structured};
use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use colored::*;
use cqlbridge_core::service::{DescribeKeyspaceQuery, DescribeTableQuery};
use cqlbridge_core::{
    KeyspaceDescription, RequestHeaders, SchemaConfig, SchemaService, StaticPersistence,
    TableDescription,
};
use prettytable::{Cell, Row, Table};
use std::path::Path;
use std::sync::Arc;

fn service(catalog: &Path, config: &SchemaConfig) -> Result<SchemaService> {
    let snapshot = load_catalog(catalog)?;
    Ok(SchemaService::new(
        Arc::new(StaticPersistence::new(snapshot)),
        config.clone(),
    ))
}

pub fn describe_keyspace(
    catalog: &Path,
    keyspace: &str,
    config: &SchemaConfig,
    format: OutputFormat,
) -> Result<()> {
    let query = DescribeKeyspaceQuery {
        keyspace_name: keyspace.to_string(),
    };
    let description = service(catalog, config)?
        .describe_keyspace(&query, &RequestHeaders::new())
        .with_context(|| format!("Failed to describe keyspace {}", keyspace))?;

    match format {
        OutputFormat::Table => print_keyspace(&description),
        other => print_structured(&description, other)?,
    }
    Ok(())
}

pub fn describe_table(
    catalog: &Path,
    keyspace: &str,
    table: &str,
    config: &SchemaConfig,
    format: OutputFormat,
) -> Result<()> {
    let query = DescribeTableQuery {
        keyspace_name: keyspace.to_string(),
        table_name: table.to_string(),
    };
    let description = service(catalog, config)?
        .describe_table(&query, &RequestHeaders::new())
        .with_context(|| format!("Failed to describe table {}.{}", keyspace, table))?;

    match format {
        OutputFormat::Table => print_table(&description),
        other => print_structured(&description, other)?,
    }
    Ok(())
}

fn print_keyspace(description: &KeyspaceDescription) {
    println!("{} {}", "Keyspace:".bold(), description.keyspace.name.cyan());
    for (option, value) in &description.keyspace.options {
        println!("  {} = {}", option, value);
    }

    for udt in &description.types {
        println!();
        let frozen = if udt.frozen { " (frozen)" } else { "" };
        println!("{} {}{}", "Type:".bold(), udt.name.cyan(), frozen);
        let mut fields = Table::new();
        fields.add_row(Row::new(vec![Cell::new("Field"), Cell::new("Type")]));
        for field in &udt.fields {
            fields.add_row(Row::new(vec![
                Cell::new(&field.name),
                Cell::new(&field.type_spec.to_string()),
            ]));
        }
        fields.printstd();
    }

    for table in &description.tables {
        println!();
        print_table(table);
    }
}

fn print_table(description: &TableDescription) {
    println!("{} {}", "Table:".bold(), description.name.cyan());

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Column"),
        Cell::new("Type"),
        Cell::new("Kind"),
    ]));

    let sections = [
        ("partition key", &description.partition_key_columns),
        ("clustering", &description.clustering_key_columns),
        ("static", &description.static_columns),
        ("regular", &description.columns),
    ];
    for (kind, columns) in sections {
        for column in columns {
            let kind = match description.clustering_orders.get(&column.name) {
                Some(order) if kind == "clustering" => format!("{} {:?}", kind, order).to_uppercase(),
                _ => kind.to_string(),
            };
            table.add_row(Row::new(vec![
                Cell::new(&column.name),
                Cell::new(&column.type_spec.to_string()),
                Cell::new(&kind),
            ]));
        }
    }
    table.printstd();

    for index in &description.indexes {
        match &index.custom_type {
            Some(class) => println!(
                "  {} {} on {} using '{}'",
                "Index".bold(),
                index.name,
                index.column_name,
                class
            ),
            None => println!("  {} {} on {}", "Index".bold(), index.name, index.column_name),
        }
    }
    for view in &description.materialized_views {
        let keys: Vec<_> = view
            .partition_key_columns
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        println!(
            "  {} {} keyed by ({})",
            "View".bold(),
            view.name,
            keys.join(", ")
        );
    }
}

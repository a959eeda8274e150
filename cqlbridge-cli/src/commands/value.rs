use super::load_catalog;
use crate::cli::OutputFormat;
use anyhow::{anyhow, Context, Result};
use cqlbridge_core::{
    parse_column_type, BoundValue, Catalog, CodecConfig, ColumnType, TaggedValue,
    UserDefinedType, ValueConverter, ValueSource,
};
use std::path::Path;

/// Where user-defined types referenced by `--type` are looked up
pub struct TypeContext<'a> {
    pub catalog: Option<&'a Path>,
    pub keyspace: Option<&'a str>,
}

pub fn resolve_type(type_text: &str, context: &TypeContext<'_>) -> Result<ColumnType> {
    let udts: Vec<UserDefinedType> = match (context.catalog, context.keyspace) {
        (Some(path), Some(keyspace)) => {
            let snapshot = load_catalog(path)?;
            snapshot
                .keyspace(keyspace)
                .ok_or_else(|| anyhow!("Keyspace not found: {}", keyspace))?
                .user_types
                .clone()
        }
        (None, None) => Vec::new(),
        _ => return Err(anyhow!("--catalog and --keyspace must be given together")),
    };

    parse_column_type(type_text, &udts)
        .with_context(|| format!("Failed to parse column type '{}'", type_text))
}

/// Encode a JSON-tagged value and print the serialized bytes as hex
pub fn encode(
    type_text: &str,
    value_json: &str,
    context: &TypeContext<'_>,
    config: &CodecConfig,
) -> Result<()> {
    let column_type = resolve_type(type_text, context)?;
    let value: TaggedValue =
        serde_json::from_str(value_json).context("Failed to parse value JSON")?;

    let bound = ValueConverter::new(config)
        .to_wire(&value, &column_type)
        .with_context(|| format!("Failed to encode value as {}", column_type))?;

    match bound {
        BoundValue::Value(bytes) => println!("{}", hex::encode(bytes)),
        BoundValue::Null => println!("null"),
        BoundValue::Unset => println!("unset"),
    }
    Ok(())
}

/// Decode hex bytes and print the resulting value
pub fn decode(
    type_text: &str,
    hex_bytes: &str,
    source: ValueSource,
    context: &TypeContext<'_>,
    config: &CodecConfig,
    format: OutputFormat,
) -> Result<()> {
    let column_type = resolve_type(type_text, context)?;
    let bytes = hex::decode(hex_bytes.trim().trim_start_matches("0x"))
        .context("Failed to parse hex input")?;

    let value = ValueConverter::new(config)
        .from_wire(&bytes, &column_type, source)
        .with_context(|| format!("Failed to decode value as {}", column_type))?;

    match format {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&value)?),
        OutputFormat::Json | OutputFormat::Table => {
            println!("{}", serde_json::to_string(&value)?)
        }
    }
    Ok(())
}

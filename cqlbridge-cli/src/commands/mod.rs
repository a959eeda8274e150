use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use cqlbridge_core::SchemaSnapshot;
use serde::Serialize;
use std::path::Path;

pub mod describe;
pub mod value;

/// Read a catalog snapshot from a JSON file
pub fn load_catalog(path: &Path) -> Result<SchemaSnapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    let snapshot = SchemaSnapshot::from_json(&content)
        .with_context(|| format!("Failed to load catalog from {}", path.display()))?;
    log::debug!(
        "Loaded catalog {} with {} keyspace(s)",
        path.display(),
        snapshot.keyspaces.len()
    );
    Ok(snapshot)
}

/// Print a serializable result in a machine-readable format
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Table => {
            println!(
                "{}",
                serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")?
            );
        }
        OutputFormat::Yaml => {
            print!(
                "{}",
                serde_yaml::to_string(value).context("Failed to serialize output as YAML")?
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"{"keyspaces":[{"name":"ks"}]}"#).unwrap();
        let snapshot = load_catalog(&path).unwrap();
        assert_eq!(snapshot.keyspaces[0].name, "ks");

        assert!(load_catalog(&dir.path().join("missing.json")).is_err());
    }
}

//! Configuration management for CQLBridge

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Main configuration structure for the value and schema layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Value codec configuration
    pub codec: CodecConfig,

    /// Schema description configuration
    pub schema: SchemaConfig,
}

impl Config {
    /// Check the configuration for inconsistent settings
    pub fn validate(&self) -> Result<()> {
        if self.codec.protocol_version < ProtocolVersion::V3 {
            log::warn!(
                "protocol {} predates tuple and user-defined type values",
                self.codec.protocol_version
            );
        }
        Ok(())
    }
}

/// Value codec configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Native protocol version passed to every codec (default: V4)
    pub protocol_version: ProtocolVersion,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            protocol_version: ProtocolVersion::V4,
        }
    }
}

/// Schema description configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// How SimpleStrategy replication factors are reported
    pub simple_strategy_factor: SimpleStrategyFactor,
}

/// Reporting mode for SimpleStrategy keyspaces
///
/// Gateways have historically reported a factor of 1 for every
/// SimpleStrategy keyspace whatever the catalog stores. `Fixed` keeps that
/// behaviour so existing clients see no change; `Stored` reports the
/// catalog's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimpleStrategyFactor {
    #[default]
    Fixed,
    Stored,
}

/// Native protocol version
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ProtocolVersion {
    V2,
    V3,
    #[default]
    V4,
    V5,
}

impl ProtocolVersion {
    /// Whether collection sizes are 32-bit (V3+) rather than 16-bit
    pub fn uses_int_sizes(self) -> bool {
        self >= ProtocolVersion::V3
    }

    pub fn as_u8(self) -> u8 {
        match self {
            ProtocolVersion::V2 => 2,
            ProtocolVersion::V3 => 3,
            ProtocolVersion::V4 => 4,
            ProtocolVersion::V5 => 5,
        }
    }
}

impl TryFrom<u8> for ProtocolVersion {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            2 => Ok(ProtocolVersion::V2),
            3 => Ok(ProtocolVersion::V3),
            4 => Ok(ProtocolVersion::V4),
            5 => Ok(ProtocolVersion::V5),
            other => Err(Error::configuration(format!(
                "unsupported protocol version {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_u8())
    }
}

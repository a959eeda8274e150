//! Value conversion entry points
//!
//! [`ValueConverter::to_wire`] turns a client value into the bytes bound to a
//! statement; [`ValueConverter::from_wire`] turns column bytes back into a
//! [`TaggedValue`]. Failures leave here as a [`Status`] whose message names
//! the column type involved.

use crate::codec::{CodecRegistry, ValueCodec};
use crate::config::{CodecConfig, ProtocolVersion};
use crate::error::{Error, Status, ValueSource};
use crate::types::{BoundValue, ColumnType, TaggedValue};

/// Encodes and decodes values for one protocol version
#[derive(Debug, Clone, Copy)]
pub struct ValueConverter<'r> {
    registry: &'r CodecRegistry,
    version: ProtocolVersion,
}

impl ValueConverter<'static> {
    /// Converter over the process-wide registry
    pub fn new(config: &CodecConfig) -> Self {
        Self::with_registry(CodecRegistry::global(), config)
    }
}

impl<'r> ValueConverter<'r> {
    pub fn with_registry(registry: &'r CodecRegistry, config: &CodecConfig) -> Self {
        Self {
            registry,
            version: config.protocol_version,
        }
    }

    pub fn protocol_version(&self) -> ProtocolVersion {
        self.version
    }

    /// Encode a client-supplied value for a column of type `column_type`
    ///
    /// Top-level `Null` and `Unset` pass through as markers without touching
    /// a codec, so even an unsupported column type accepts them.
    pub fn to_wire(
        &self,
        value: &TaggedValue,
        column_type: &ColumnType,
    ) -> std::result::Result<BoundValue, Status> {
        match value {
            TaggedValue::Null => return Ok(BoundValue::Null),
            TaggedValue::Unset => return Ok(BoundValue::Unset),
            _ => {}
        }

        self.registry
            .resolve(column_type)
            .and_then(|codec| codec.encode(value, self.version))
            .map(BoundValue::Value)
            .map_err(|e| status_for(&e, column_type, ValueSource::Client))
    }

    /// Decode column bytes; `source` decides how malformed input is reported
    pub fn from_wire(
        &self,
        bytes: &[u8],
        column_type: &ColumnType,
        source: ValueSource,
    ) -> std::result::Result<TaggedValue, Status> {
        self.registry
            .resolve(column_type)
            .and_then(|codec| codec.decode(bytes, self.version))
            .map_err(|e| status_for(&e, column_type, source))
    }

    /// Decode an optional column cell, where `None` is a null cell
    pub fn from_wire_nullable(
        &self,
        bytes: Option<&[u8]>,
        column_type: &ColumnType,
        source: ValueSource,
    ) -> std::result::Result<TaggedValue, Status> {
        match bytes {
            Some(bytes) => self.from_wire(bytes, column_type, source),
            None => Ok(TaggedValue::Null),
        }
    }
}

impl Default for ValueConverter<'static> {
    fn default() -> Self {
        Self::new(&CodecConfig::default())
    }
}

fn status_for(err: &Error, column_type: &ColumnType, source: ValueSource) -> Status {
    log::debug!("Value conversion for {} failed: {}", column_type, err);
    let mut status = err.to_status(source);
    status.message = format!("Invalid value for column type {}: {}", column_type, status.message);
    status
}

/// Encode with the global registry and the given codec settings
pub fn to_wire(
    value: &TaggedValue,
    column_type: &ColumnType,
    config: &CodecConfig,
) -> std::result::Result<BoundValue, Status> {
    ValueConverter::new(config).to_wire(value, column_type)
}

/// Decode with the global registry and the given codec settings
pub fn from_wire(
    bytes: &[u8],
    column_type: &ColumnType,
    source: ValueSource,
    config: &CodecConfig,
) -> std::result::Result<TaggedValue, Status> {
    ValueConverter::new(config).from_wire(bytes, column_type, source)
}

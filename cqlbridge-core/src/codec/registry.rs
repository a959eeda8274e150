//! Codec registry and dispatch
//!
//! The registry owns one codec per primitive kind, built once at startup.
//! Composite types get a codec assembled on demand from their element
//! codecs; nothing is cached, so concurrent lookups never contend.

use super::collection::{MapCodec, SequenceCodec};
use super::composite::{TupleCodec, UdtCodec};
use super::primitive::*;
use super::CodecRef;
use crate::error::{Error, Result};
use crate::types::{ColumnType, PrimitiveType};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

static GLOBAL: Lazy<CodecRegistry> = Lazy::new(CodecRegistry::new);

/// Maps column types to codecs
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    primitives: HashMap<PrimitiveType, CodecRef>,
}

impl CodecRegistry {
    /// Build a registry holding a codec for every primitive kind
    pub fn new() -> Self {
        let primitives = PrimitiveType::ALL
            .iter()
            .map(|&kind| (kind, primitive_codec(kind)))
            .collect();
        Self { primitives }
    }

    /// Process-wide registry
    pub fn global() -> &'static CodecRegistry {
        &GLOBAL
    }

    /// Codec for a primitive kind
    pub fn primitive(&self, kind: PrimitiveType) -> Result<CodecRef> {
        self.primitives
            .get(&kind)
            .cloned()
            .ok_or_else(|| Error::unsupported_type(kind.cql_name()))
    }

    /// Resolve the codec for a column type, recursing into composite kinds
    pub fn resolve(&self, column_type: &ColumnType) -> Result<CodecRef> {
        log::trace!("Resolving codec for {}", column_type);

        let codec: CodecRef = match column_type {
            ColumnType::Primitive(kind) => return self.primitive(*kind),
            ColumnType::List(element) => Arc::new(SequenceCodec::list(self.resolve(element)?)),
            ColumnType::Set(element) => Arc::new(SequenceCodec::set(self.resolve(element)?)),
            ColumnType::Map(key, value) => {
                Arc::new(MapCodec::new(self.resolve(key)?, self.resolve(value)?))
            }
            ColumnType::Tuple(elements) => Arc::new(TupleCodec::new(
                elements
                    .iter()
                    .map(|element| self.resolve(element))
                    .collect::<Result<Vec<_>>>()?,
            )),
            ColumnType::Udt(udt) => {
                let fields = udt
                    .fields
                    .iter()
                    .map(|field| Ok((field.name.clone(), self.resolve(&field.field_type)?)))
                    .collect::<Result<Vec<_>>>()?;
                Arc::new(UdtCodec::new(&udt.name, fields, udt.frozen))
            }
            ColumnType::Custom(class_name) => {
                return Err(Error::unsupported_type(format!(
                    "custom type '{}'",
                    class_name
                )))
            }
        };
        Ok(codec)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn primitive_codec(kind: PrimitiveType) -> CodecRef {
    match kind {
        PrimitiveType::TinyInt
        | PrimitiveType::SmallInt
        | PrimitiveType::Int
        | PrimitiveType::BigInt
        | PrimitiveType::Counter
        | PrimitiveType::Timestamp => Arc::new(IntegerCodec::new(kind)),
        PrimitiveType::Boolean => Arc::new(BooleanCodec),
        PrimitiveType::Float => Arc::new(FloatCodec),
        PrimitiveType::Double => Arc::new(DoubleCodec),
        PrimitiveType::Ascii | PrimitiveType::Text | PrimitiveType::Varchar => {
            Arc::new(StringCodec::new(kind))
        }
        PrimitiveType::Blob => Arc::new(BlobCodec),
        PrimitiveType::Uuid | PrimitiveType::TimeUuid => Arc::new(UuidCodec::new(kind)),
        PrimitiveType::Inet => Arc::new(InetCodec),
        PrimitiveType::Date => Arc::new(DateCodec),
        PrimitiveType::Time => Arc::new(TimeCodec),
        PrimitiveType::Varint => Arc::new(VarintCodec),
        PrimitiveType::Decimal => Arc::new(DecimalCodec),
        PrimitiveType::Duration => Arc::new(DurationCodec),
    }
}

/// Shorthand for resolving against the global registry
pub fn codec_for(column_type: &ColumnType) -> Result<CodecRef> {
    CodecRegistry::global().resolve(column_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ValueCodec;
    use crate::config::ProtocolVersion;
    use crate::translator::translate;
    use crate::types::{TaggedValue, UserDefinedType};

    #[test]
    fn test_every_primitive_has_a_codec() {
        let registry = CodecRegistry::new();
        for kind in PrimitiveType::ALL {
            let codec = registry.primitive(kind).unwrap();
            assert_eq!(codec.type_spec(), translate(&kind.into()));
        }
    }

    #[test]
    fn test_composite_spec_matches_translation() {
        let address = UserDefinedType::new("address")
            .with_field("street", PrimitiveType::Text)
            .with_field("zip", PrimitiveType::Int);
        let ty = ColumnType::map(
            PrimitiveType::Text,
            ColumnType::list(ColumnType::tuple([
                ColumnType::from(PrimitiveType::Int),
                ColumnType::from(address),
            ])),
        );
        let codec = CodecRegistry::global().resolve(&ty).unwrap();
        assert_eq!(codec.type_spec(), translate(&ty));
    }

    #[test]
    fn test_custom_type_unsupported() {
        let ty = ColumnType::list(ColumnType::Custom("org.example.Point".into()));
        let err = codec_for(&ty).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }

    #[test]
    fn test_resolved_codec_encodes() {
        let codec = codec_for(&ColumnType::set(PrimitiveType::BigInt)).unwrap();
        let bytes = codec
            .encode(
                &TaggedValue::Set(vec![TaggedValue::Int(i64::MAX)]),
                ProtocolVersion::V4,
            )
            .unwrap();
        assert_eq!(bytes.len(), 4 + 4 + 8);
    }
}

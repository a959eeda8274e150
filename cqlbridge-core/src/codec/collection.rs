//! List, set and map codecs
//!
//! Layout: element count followed by size-prefixed elements (maps alternate
//! key and value). Count and sizes are `u16` under V2 and `i32` from V3.

use super::{
    decode_nested, encode_nested, expect_consumed, read_count, read_element, write_element,
    write_size, CodecRef, SizeWidth, ValueCodec,
};
use crate::config::ProtocolVersion;
use crate::error::{Error, Result};
use crate::translator::TypeSpec;
use crate::types::TaggedValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    List,
    Set,
}

/// Codec for `list<T>` and `set<T>`
#[derive(Debug, Clone)]
pub struct SequenceCodec {
    kind: SequenceKind,
    element: CodecRef,
    spec: TypeSpec,
}

impl SequenceCodec {
    pub fn list(element: CodecRef) -> Self {
        let spec = TypeSpec::List(Box::new(element.type_spec()));
        Self {
            kind: SequenceKind::List,
            element,
            spec,
        }
    }

    pub fn set(element: CodecRef) -> Self {
        let spec = TypeSpec::Set(Box::new(element.type_spec()));
        Self {
            kind: SequenceKind::Set,
            element,
            spec,
        }
    }

    fn elements<'v>(&self, value: &'v TaggedValue) -> Result<&'v [TaggedValue]> {
        match (self.kind, value) {
            (SequenceKind::List, TaggedValue::List(items)) => Ok(items),
            (SequenceKind::Set, TaggedValue::Set(items)) => Ok(items),
            (_, other) => Err(Error::type_mismatch(
                self.spec.to_string(),
                other.kind_name(),
            )),
        }
    }

    fn wrap(&self, items: Vec<TaggedValue>) -> TaggedValue {
        match self.kind {
            SequenceKind::List => TaggedValue::List(items),
            SequenceKind::Set => TaggedValue::Set(items),
        }
    }
}

impl ValueCodec for SequenceCodec {
    fn type_spec(&self) -> TypeSpec {
        self.spec.clone()
    }

    fn encode(&self, value: &TaggedValue, version: ProtocolVersion) -> Result<Vec<u8>> {
        let items = self.elements(value)?;
        let name = self.spec.to_string();
        let width = SizeWidth::for_collection(version);

        let mut buf = Vec::new();
        write_size(&mut buf, items.len(), width, &name)?;
        for item in items {
            let bytes = encode_nested(self.element.as_ref(), item, version)?;
            write_element(&mut buf, bytes.as_deref(), width, &name)?;
        }
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8], version: ProtocolVersion) -> Result<TaggedValue> {
        let name = self.spec.to_string();
        let width = SizeWidth::for_collection(version);

        let (mut rest, count) = read_count(bytes, width, &name)?;
        // Never trust the count for preallocation
        let mut items = Vec::with_capacity(count.min(rest.len()));
        for _ in 0..count {
            let (next, element) = read_element(rest, width, &name)?;
            items.push(decode_nested(self.element.as_ref(), element, version)?);
            rest = next;
        }
        expect_consumed(rest, &name)?;
        Ok(self.wrap(items))
    }
}

/// Codec for `map<K, V>`; pair order is preserved in both directions
#[derive(Debug, Clone)]
pub struct MapCodec {
    key: CodecRef,
    value: CodecRef,
    spec: TypeSpec,
}

impl MapCodec {
    pub fn new(key: CodecRef, value: CodecRef) -> Self {
        let spec = TypeSpec::Map {
            key: Box::new(key.type_spec()),
            value: Box::new(value.type_spec()),
        };
        Self { key, value, spec }
    }
}

impl ValueCodec for MapCodec {
    fn type_spec(&self) -> TypeSpec {
        self.spec.clone()
    }

    fn encode(&self, value: &TaggedValue, version: ProtocolVersion) -> Result<Vec<u8>> {
        let TaggedValue::Map(pairs) = value else {
            return Err(Error::type_mismatch(
                self.spec.to_string(),
                value.kind_name(),
            ));
        };
        let name = self.spec.to_string();
        let width = SizeWidth::for_collection(version);

        let mut buf = Vec::new();
        write_size(&mut buf, pairs.len(), width, &name)?;
        for (k, v) in pairs {
            let key_bytes = encode_nested(self.key.as_ref(), k, version)?;
            let value_bytes = encode_nested(self.value.as_ref(), v, version)?;
            write_element(&mut buf, key_bytes.as_deref(), width, &name)?;
            write_element(&mut buf, value_bytes.as_deref(), width, &name)?;
        }
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8], version: ProtocolVersion) -> Result<TaggedValue> {
        let name = self.spec.to_string();
        let width = SizeWidth::for_collection(version);

        let (mut rest, count) = read_count(bytes, width, &name)?;
        let mut pairs = Vec::with_capacity(count.min(rest.len()));
        for _ in 0..count {
            let (next, key) = read_element(rest, width, &name)?;
            let (next, value) = read_element(next, width, &name)?;
            pairs.push((
                decode_nested(self.key.as_ref(), key, version)?,
                decode_nested(self.value.as_ref(), value, version)?,
            ));
            rest = next;
        }
        expect_consumed(rest, &name)?;
        Ok(TaggedValue::Map(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::primitive::{IntegerCodec, StringCodec};
    use crate::types::PrimitiveType;
    use std::sync::Arc;

    fn int_codec() -> CodecRef {
        Arc::new(IntegerCodec::new(PrimitiveType::Int))
    }

    fn text_codec() -> CodecRef {
        Arc::new(StringCodec::new(PrimitiveType::Text))
    }

    #[test]
    fn test_list_layout_v4() {
        let codec = SequenceCodec::list(int_codec());
        let value = TaggedValue::List(vec![TaggedValue::Int(1), TaggedValue::Int(2)]);
        let bytes = codec.encode(&value, ProtocolVersion::V4).unwrap();
        assert_eq!(
            bytes,
            vec![
                0, 0, 0, 2, // count
                0, 0, 0, 4, 0, 0, 0, 1, // first
                0, 0, 0, 4, 0, 0, 0, 2, // second
            ]
        );
        assert_eq!(codec.decode(&bytes, ProtocolVersion::V4).unwrap(), value);
    }

    #[test]
    fn test_list_layout_v2_uses_short_sizes() {
        let codec = SequenceCodec::list(int_codec());
        let value = TaggedValue::List(vec![TaggedValue::Int(7)]);
        let bytes = codec.encode(&value, ProtocolVersion::V2).unwrap();
        assert_eq!(bytes, vec![0, 1, 0, 4, 0, 0, 0, 7]);
        assert_eq!(codec.decode(&bytes, ProtocolVersion::V2).unwrap(), value);
    }

    #[test]
    fn test_set_rejects_list_value() {
        let codec = SequenceCodec::set(int_codec());
        let err = codec
            .encode(&TaggedValue::List(vec![]), ProtocolVersion::V4)
            .unwrap_err();
        assert_eq!(err, Error::type_mismatch("set<int>", "list"));
    }

    #[test]
    fn test_null_element_roundtrip() {
        let codec = SequenceCodec::list(text_codec());
        let value = TaggedValue::List(vec![TaggedValue::Null, TaggedValue::String("a".into())]);
        let bytes = codec.encode(&value, ProtocolVersion::V4).unwrap();
        assert_eq!(&bytes[4..8], &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(codec.decode(&bytes, ProtocolVersion::V4).unwrap(), value);
    }

    #[test]
    fn test_unset_element_rejected() {
        let codec = SequenceCodec::list(int_codec());
        let value = TaggedValue::List(vec![TaggedValue::Unset]);
        assert!(matches!(
            codec.encode(&value, ProtocolVersion::V4),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_map_preserves_pair_order() {
        let codec = MapCodec::new(text_codec(), int_codec());
        let value = TaggedValue::Map(vec![
            (TaggedValue::String("z".into()), TaggedValue::Int(1)),
            (TaggedValue::String("a".into()), TaggedValue::Int(2)),
        ]);
        let bytes = codec.encode(&value, ProtocolVersion::V4).unwrap();
        assert_eq!(codec.decode(&bytes, ProtocolVersion::V4).unwrap(), value);
    }

    #[test]
    fn test_map_count_exceeding_pairs_is_malformed() {
        let codec = MapCodec::new(int_codec(), int_codec());
        // Declares two pairs, carries one
        let bytes = [
            0, 0, 0, 2, //
            0, 0, 0, 4, 0, 0, 0, 1, //
            0, 0, 0, 4, 0, 0, 0, 9,
        ];
        assert!(matches!(
            codec.decode(&bytes, ProtocolVersion::V4),
            Err(Error::MalformedValue { .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_are_corrupt() {
        let codec = SequenceCodec::list(int_codec());
        let bytes = [0, 0, 0, 0, 0xAB];
        assert!(matches!(
            codec.decode(&bytes, ProtocolVersion::V4),
            Err(Error::CorruptValue { .. })
        ));
    }

    #[test]
    fn test_nested_element_error_propagates() {
        let codec = SequenceCodec::list(int_codec());
        let value = TaggedValue::List(vec![TaggedValue::Int(1 << 40)]);
        assert!(matches!(
            codec.encode(&value, ProtocolVersion::V4),
            Err(Error::OutOfRange { .. })
        ));
    }
}

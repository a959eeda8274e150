//! Tuple and user-defined type codecs
//!
//! Both serialize their fields back to back, each with an `i32` size prefix
//! regardless of protocol version. A value that ends early leaves the
//! remaining fields null.

use super::{
    decode_nested, encode_nested, expect_consumed, read_element, write_element, CodecRef,
    SizeWidth, ValueCodec,
};
use crate::config::ProtocolVersion;
use crate::error::{Error, Result};
use crate::translator::{TypeSpec, UdtFieldSpec, UdtSpec};
use crate::types::TaggedValue;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct TupleCodec {
    elements: Vec<CodecRef>,
    spec: TypeSpec,
}

impl TupleCodec {
    pub fn new(elements: Vec<CodecRef>) -> Self {
        let spec = TypeSpec::Tuple(elements.iter().map(|c| c.type_spec()).collect());
        Self { elements, spec }
    }
}

impl ValueCodec for TupleCodec {
    fn type_spec(&self) -> TypeSpec {
        self.spec.clone()
    }

    fn encode(&self, value: &TaggedValue, version: ProtocolVersion) -> Result<Vec<u8>> {
        let TaggedValue::Tuple(items) = value else {
            return Err(Error::type_mismatch(
                self.spec.to_string(),
                value.kind_name(),
            ));
        };
        if items.len() > self.elements.len() {
            return Err(Error::type_mismatch(
                self.spec.to_string(),
                format!("tuple of {} elements", items.len()),
            ));
        }

        let name = self.spec.to_string();
        let mut buf = Vec::new();
        for (codec, item) in self.elements.iter().zip(items) {
            let bytes = encode_nested(codec.as_ref(), item, version)?;
            write_element(&mut buf, bytes.as_deref(), SizeWidth::Int, &name)?;
        }
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8], version: ProtocolVersion) -> Result<TaggedValue> {
        let name = self.spec.to_string();
        let mut rest = bytes;
        let mut items = Vec::with_capacity(self.elements.len());
        for codec in &self.elements {
            if rest.is_empty() {
                items.push(TaggedValue::Null);
                continue;
            }
            let (next, element) = read_element(rest, SizeWidth::Int, &name)?;
            items.push(decode_nested(codec.as_ref(), element, version)?);
            rest = next;
        }
        expect_consumed(rest, &name)?;
        Ok(TaggedValue::Tuple(items))
    }
}

/// Codec for a user-defined type; fields are serialized in declared order
#[derive(Debug, Clone)]
pub struct UdtCodec {
    name: String,
    fields: Vec<(String, CodecRef)>,
    frozen: bool,
}

impl UdtCodec {
    pub fn new(name: impl Into<String>, fields: Vec<(String, CodecRef)>, frozen: bool) -> Self {
        Self {
            name: name.into(),
            fields,
            frozen,
        }
    }
}

impl ValueCodec for UdtCodec {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::Udt(UdtSpec {
            name: self.name.clone(),
            fields: self
                .fields
                .iter()
                .map(|(name, codec)| UdtFieldSpec {
                    name: name.clone(),
                    type_spec: codec.type_spec(),
                })
                .collect(),
            frozen: self.frozen,
        })
    }

    fn encode(&self, value: &TaggedValue, version: ProtocolVersion) -> Result<Vec<u8>> {
        let TaggedValue::Udt(values) = value else {
            return Err(Error::type_mismatch(&self.name, value.kind_name()));
        };
        if let Some(unknown) = values
            .keys()
            .find(|key| !self.fields.iter().any(|(name, _)| name == *key))
        {
            return Err(Error::type_mismatch(
                format!("field of {}", self.name),
                format!("unknown field '{}'", unknown),
            ));
        }

        let mut buf = Vec::new();
        for (field, codec) in &self.fields {
            let bytes = match values.get(field) {
                Some(v) => encode_nested(codec.as_ref(), v, version)?,
                None => None,
            };
            write_element(&mut buf, bytes.as_deref(), SizeWidth::Int, &self.name)?;
        }
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8], version: ProtocolVersion) -> Result<TaggedValue> {
        let mut rest = bytes;
        let mut values = BTreeMap::new();
        for (field, codec) in &self.fields {
            let value = if rest.is_empty() {
                TaggedValue::Null
            } else {
                let (next, element) = read_element(rest, SizeWidth::Int, &self.name)?;
                rest = next;
                decode_nested(codec.as_ref(), element, version)?
            };
            values.insert(field.clone(), value);
        }
        expect_consumed(rest, &self.name)?;
        Ok(TaggedValue::Udt(values))
    }
}

//! Value codecs
//!
//! A codec converts one [`TaggedValue`] shape to and from the store's native
//! column bytes. Codecs are immutable once built: primitive codecs live in
//! the [`CodecRegistry`] for the whole process, composite codecs are
//! assembled by [`CodecRegistry::resolve`] from their element codecs.
//!
//! Length prefixes inside composite values:
//!
//! | container        | V2                     | V3+               |
//! |------------------|------------------------|-------------------|
//! | list/set/map     | `u16` count and sizes  | `i32` count/sizes |
//! | tuple/udt fields | `i32` sizes            | `i32` sizes       |
//!
//! A size of `-1` marks a null element.

pub mod collection;
pub mod composite;
pub mod primitive;
pub mod registry;
pub mod vint;

pub use registry::CodecRegistry;

use crate::config::ProtocolVersion;
use crate::error::{Error, Result};
use crate::translator::TypeSpec;
use crate::types::TaggedValue;
use bytes::BufMut;
use nom::{
    bytes::streaming::take,
    number::streaming::{be_i32, be_u16},
    IResult, Needed,
};
use std::fmt;
use std::sync::Arc;

/// Shared handle to an immutable codec
pub type CodecRef = Arc<dyn ValueCodec>;

/// Stateless converter between a wire value and native column bytes
pub trait ValueCodec: Send + Sync + fmt::Debug {
    /// Wire type this codec is bound to
    fn type_spec(&self) -> TypeSpec;

    /// Serialize a non-null value
    fn encode(&self, value: &TaggedValue, version: ProtocolVersion) -> Result<Vec<u8>>;

    /// Deserialize a complete, non-null value
    fn decode(&self, bytes: &[u8], version: ProtocolVersion) -> Result<TaggedValue>;
}

/// How wide the size prefix of an element of `container` is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SizeWidth {
    Short,
    Int,
}

impl SizeWidth {
    /// Sizes used by list, set and map values
    pub(crate) fn for_collection(version: ProtocolVersion) -> Self {
        if version.uses_int_sizes() {
            SizeWidth::Int
        } else {
            SizeWidth::Short
        }
    }
}

/// Write an element count or element size
pub(crate) fn write_size(
    buf: &mut Vec<u8>,
    size: usize,
    width: SizeWidth,
    type_name: &str,
) -> Result<()> {
    match width {
        SizeWidth::Short => {
            let size = u16::try_from(size)
                .map_err(|_| Error::out_of_range(format!("{} size", type_name), 0, u16::MAX))?;
            buf.put_u16(size);
        }
        SizeWidth::Int => {
            let size = i32::try_from(size)
                .map_err(|_| Error::out_of_range(format!("{} size", type_name), 0, i32::MAX))?;
            buf.put_i32(size);
        }
    }
    Ok(())
}

/// Write one size-prefixed element; `None` is a null element
pub(crate) fn write_element(
    buf: &mut Vec<u8>,
    element: Option<&[u8]>,
    width: SizeWidth,
    type_name: &str,
) -> Result<()> {
    match element {
        Some(bytes) => {
            write_size(buf, bytes.len(), width, type_name)?;
            buf.put_slice(bytes);
        }
        None if width == SizeWidth::Int => buf.put_i32(-1),
        None => {
            return Err(Error::type_mismatch(
                format!("non-null {} element", type_name),
                "null",
            ))
        }
    }
    Ok(())
}

/// Encode a nested value, passing nulls through as `None`
pub(crate) fn encode_nested(
    codec: &dyn ValueCodec,
    value: &TaggedValue,
    version: ProtocolVersion,
) -> Result<Option<Vec<u8>>> {
    match value {
        TaggedValue::Null => Ok(None),
        TaggedValue::Unset => Err(Error::type_mismatch(codec.type_spec().to_string(), "unset")),
        other => codec.encode(other, version).map(Some),
    }
}

/// Decode a nested value, turning a null element into [`TaggedValue::Null`]
pub(crate) fn decode_nested(
    codec: &dyn ValueCodec,
    element: Option<&[u8]>,
    version: ProtocolVersion,
) -> Result<TaggedValue> {
    match element {
        Some(bytes) => codec.decode(bytes, version),
        None => Ok(TaggedValue::Null),
    }
}

fn parse_size(input: &[u8], width: SizeWidth) -> IResult<&[u8], i64> {
    match width {
        SizeWidth::Short => be_u16(input).map(|(rest, size)| (rest, i64::from(size))),
        SizeWidth::Int => be_i32(input).map(|(rest, size)| (rest, i64::from(size))),
    }
}

/// Convert a streaming nom failure into a codec error
fn nom_to_error(type_name: &str, available: usize, err: nom::Err<nom::error::Error<&[u8]>>) -> Error {
    match err {
        nom::Err::Incomplete(Needed::Size(missing)) => {
            Error::malformed(type_name, available + missing.get(), available)
        }
        nom::Err::Incomplete(Needed::Unknown) => {
            Error::malformed(type_name, available + 1, available)
        }
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            Error::corrupt(type_name, format!("unreadable input ({:?})", e.code))
        }
    }
}

/// Read an element count
pub(crate) fn read_count<'a>(
    input: &'a [u8],
    width: SizeWidth,
    type_name: &str,
) -> Result<(&'a [u8], usize)> {
    let (rest, count) =
        parse_size(input, width).map_err(|e| nom_to_error(type_name, input.len(), e))?;
    let count = usize::try_from(count)
        .map_err(|_| Error::corrupt(type_name, format!("negative element count {}", count)))?;
    Ok((rest, count))
}

/// Read one size-prefixed element; a size of `-1` yields `None`
pub(crate) fn read_element<'a>(
    input: &'a [u8],
    width: SizeWidth,
    type_name: &str,
) -> Result<(&'a [u8], Option<&'a [u8]>)> {
    let (rest, size) =
        parse_size(input, width).map_err(|e| nom_to_error(type_name, input.len(), e))?;
    if size == -1 {
        return Ok((rest, None));
    }
    let size = usize::try_from(size)
        .map_err(|_| Error::corrupt(type_name, format!("invalid element size {}", size)))?;
    let (rest, bytes) = take::<_, _, nom::error::Error<&[u8]>>(size)(rest)
        .map_err(|e| nom_to_error(type_name, input.len(), e))?;
    Ok((rest, Some(bytes)))
}

/// Fail if bytes remain after a complete value
pub(crate) fn expect_consumed(rest: &[u8], type_name: &str) -> Result<()> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(Error::corrupt(
            type_name,
            format!("{} trailing bytes after value", rest.len()),
        ))
    }
}

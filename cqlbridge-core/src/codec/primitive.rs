//! Codecs for the fixed set of primitive CQL kinds

use super::vint::{encode_vint, parse_vint};
use super::ValueCodec;
use crate::config::ProtocolVersion;
use crate::error::{Error, Result};
use crate::translator::TypeSpec;
use crate::types::{DecimalValue, DurationValue, PrimitiveType, TaggedValue};
use bytes::BufMut;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use uuid::Uuid;

/// Largest valid `time` value: one nanosecond before midnight
pub const MAX_TIME_NANOS: u64 = 86_399_999_999_999;

fn mismatch(kind: PrimitiveType, value: &TaggedValue) -> Error {
    Error::type_mismatch(kind.cql_name(), value.kind_name())
}

/// Require exactly `N` bytes and return them as an array
fn fixed<const N: usize>(kind: PrimitiveType, bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| Error::malformed(kind.cql_name(), N, bytes.len()))
}

/// Narrow to the target width, failing with the target's bounds
macro_rules! narrow {
    ($value:expr, $target:ty, $kind:expr) => {{
        let narrowed = <$target>::try_from($value).map_err(|_| {
            Error::out_of_range($kind.cql_name(), <$target>::MIN, <$target>::MAX)
        })?;
        narrowed.to_be_bytes().to_vec()
    }};
}

/// `tinyint`, `smallint`, `int`, `bigint`, `counter` and `timestamp`
#[derive(Debug, Clone, Copy)]
pub struct IntegerCodec {
    kind: PrimitiveType,
}

impl IntegerCodec {
    pub fn new(kind: PrimitiveType) -> Self {
        debug_assert!(matches!(
            kind,
            PrimitiveType::TinyInt
                | PrimitiveType::SmallInt
                | PrimitiveType::Int
                | PrimitiveType::BigInt
                | PrimitiveType::Counter
                | PrimitiveType::Timestamp
        ));
        Self { kind }
    }
}

impl ValueCodec for IntegerCodec {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::Basic(self.kind.into())
    }

    fn encode(&self, value: &TaggedValue, _version: ProtocolVersion) -> Result<Vec<u8>> {
        let TaggedValue::Int(v) = *value else {
            return Err(mismatch(self.kind, value));
        };
        let bytes = match self.kind {
            PrimitiveType::TinyInt => narrow!(v, i8, self.kind),
            PrimitiveType::SmallInt => narrow!(v, i16, self.kind),
            PrimitiveType::Int => narrow!(v, i32, self.kind),
            _ => v.to_be_bytes().to_vec(),
        };
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8], _version: ProtocolVersion) -> Result<TaggedValue> {
        let v = match self.kind {
            PrimitiveType::TinyInt => i64::from(i8::from_be_bytes(fixed(self.kind, bytes)?)),
            PrimitiveType::SmallInt => i64::from(i16::from_be_bytes(fixed(self.kind, bytes)?)),
            PrimitiveType::Int => i64::from(i32::from_be_bytes(fixed(self.kind, bytes)?)),
            _ => i64::from_be_bytes(fixed(self.kind, bytes)?),
        };
        Ok(TaggedValue::Int(v))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanCodec;

impl ValueCodec for BooleanCodec {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::Basic(PrimitiveType::Boolean.into())
    }

    fn encode(&self, value: &TaggedValue, _version: ProtocolVersion) -> Result<Vec<u8>> {
        match value {
            TaggedValue::Boolean(b) => Ok(vec![u8::from(*b)]),
            other => Err(mismatch(PrimitiveType::Boolean, other)),
        }
    }

    fn decode(&self, bytes: &[u8], _version: ProtocolVersion) -> Result<TaggedValue> {
        let [b] = fixed::<1>(PrimitiveType::Boolean, bytes)?;
        Ok(TaggedValue::Boolean(b != 0))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatCodec;

impl ValueCodec for FloatCodec {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::Basic(PrimitiveType::Float.into())
    }

    fn encode(&self, value: &TaggedValue, _version: ProtocolVersion) -> Result<Vec<u8>> {
        match value {
            TaggedValue::Float(f) => Ok(f.to_be_bytes().to_vec()),
            other => Err(mismatch(PrimitiveType::Float, other)),
        }
    }

    fn decode(&self, bytes: &[u8], _version: ProtocolVersion) -> Result<TaggedValue> {
        Ok(TaggedValue::Float(f32::from_be_bytes(fixed(
            PrimitiveType::Float,
            bytes,
        )?)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleCodec;

impl ValueCodec for DoubleCodec {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::Basic(PrimitiveType::Double.into())
    }

    fn encode(&self, value: &TaggedValue, _version: ProtocolVersion) -> Result<Vec<u8>> {
        match value {
            TaggedValue::Double(d) => Ok(d.to_be_bytes().to_vec()),
            other => Err(mismatch(PrimitiveType::Double, other)),
        }
    }

    fn decode(&self, bytes: &[u8], _version: ProtocolVersion) -> Result<TaggedValue> {
        Ok(TaggedValue::Double(f64::from_be_bytes(fixed(
            PrimitiveType::Double,
            bytes,
        )?)))
    }
}

/// `ascii`, `text` and `varchar`
#[derive(Debug, Clone, Copy)]
pub struct StringCodec {
    kind: PrimitiveType,
}

impl StringCodec {
    pub fn new(kind: PrimitiveType) -> Self {
        Self { kind }
    }

    fn ascii_only(&self) -> bool {
        self.kind == PrimitiveType::Ascii
    }
}

impl ValueCodec for StringCodec {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::Basic(self.kind.into())
    }

    fn encode(&self, value: &TaggedValue, _version: ProtocolVersion) -> Result<Vec<u8>> {
        let TaggedValue::String(s) = value else {
            return Err(mismatch(self.kind, value));
        };
        if self.ascii_only() && !s.is_ascii() {
            return Err(Error::type_mismatch("ascii", "non-ascii string"));
        }
        Ok(s.as_bytes().to_vec())
    }

    fn decode(&self, bytes: &[u8], _version: ProtocolVersion) -> Result<TaggedValue> {
        if self.ascii_only() && !bytes.is_ascii() {
            return Err(Error::corrupt(self.kind.cql_name(), "non-ascii byte"));
        }
        let s = std::str::from_utf8(bytes)
            .map_err(|e| Error::corrupt(self.kind.cql_name(), e.to_string()))?;
        Ok(TaggedValue::String(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BlobCodec;

impl ValueCodec for BlobCodec {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::Basic(PrimitiveType::Blob.into())
    }

    fn encode(&self, value: &TaggedValue, _version: ProtocolVersion) -> Result<Vec<u8>> {
        match value {
            TaggedValue::Bytes(b) => Ok(b.clone()),
            other => Err(mismatch(PrimitiveType::Blob, other)),
        }
    }

    fn decode(&self, bytes: &[u8], _version: ProtocolVersion) -> Result<TaggedValue> {
        Ok(TaggedValue::Bytes(bytes.to_vec()))
    }
}

/// `uuid` and `timeuuid`; the latter only accepts version 1 identifiers
#[derive(Debug, Clone, Copy)]
pub struct UuidCodec {
    kind: PrimitiveType,
}

impl UuidCodec {
    pub fn new(kind: PrimitiveType) -> Self {
        Self { kind }
    }
}

impl ValueCodec for UuidCodec {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::Basic(self.kind.into())
    }

    fn encode(&self, value: &TaggedValue, _version: ProtocolVersion) -> Result<Vec<u8>> {
        let TaggedValue::Uuid(uuid) = value else {
            return Err(mismatch(self.kind, value));
        };
        if self.kind == PrimitiveType::TimeUuid && uuid.get_version_num() != 1 {
            return Err(Error::type_mismatch(
                "timeuuid (version 1 uuid)",
                format!("version {} uuid", uuid.get_version_num()),
            ));
        }
        Ok(uuid.as_bytes().to_vec())
    }

    fn decode(&self, bytes: &[u8], _version: ProtocolVersion) -> Result<TaggedValue> {
        Ok(TaggedValue::Uuid(Uuid::from_bytes(fixed(self.kind, bytes)?)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InetCodec;

impl ValueCodec for InetCodec {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::Basic(PrimitiveType::Inet.into())
    }

    fn encode(&self, value: &TaggedValue, _version: ProtocolVersion) -> Result<Vec<u8>> {
        match value {
            TaggedValue::Inet(IpAddr::V4(addr)) => Ok(addr.octets().to_vec()),
            TaggedValue::Inet(IpAddr::V6(addr)) => Ok(addr.octets().to_vec()),
            other => Err(mismatch(PrimitiveType::Inet, other)),
        }
    }

    fn decode(&self, bytes: &[u8], _version: ProtocolVersion) -> Result<TaggedValue> {
        let addr = match bytes.len() {
            4 => IpAddr::V4(Ipv4Addr::from(fixed::<4>(PrimitiveType::Inet, bytes)?)),
            16 => IpAddr::V6(Ipv6Addr::from(fixed::<16>(PrimitiveType::Inet, bytes)?)),
            n => {
                return Err(Error::corrupt(
                    "inet",
                    format!("expected 4 or 16 bytes, got {}", n),
                ))
            }
        };
        Ok(TaggedValue::Inet(addr))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DateCodec;

impl ValueCodec for DateCodec {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::Basic(PrimitiveType::Date.into())
    }

    fn encode(&self, value: &TaggedValue, _version: ProtocolVersion) -> Result<Vec<u8>> {
        match value {
            TaggedValue::Date(days) => Ok(days.to_be_bytes().to_vec()),
            other => Err(mismatch(PrimitiveType::Date, other)),
        }
    }

    fn decode(&self, bytes: &[u8], _version: ProtocolVersion) -> Result<TaggedValue> {
        Ok(TaggedValue::Date(u32::from_be_bytes(fixed(
            PrimitiveType::Date,
            bytes,
        )?)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeCodec;

impl ValueCodec for TimeCodec {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::Basic(PrimitiveType::Time.into())
    }

    fn encode(&self, value: &TaggedValue, _version: ProtocolVersion) -> Result<Vec<u8>> {
        let TaggedValue::Time(nanos) = *value else {
            return Err(mismatch(PrimitiveType::Time, value));
        };
        if nanos > MAX_TIME_NANOS {
            return Err(Error::out_of_range("time", 0, MAX_TIME_NANOS));
        }
        Ok(nanos.to_be_bytes().to_vec())
    }

    fn decode(&self, bytes: &[u8], _version: ProtocolVersion) -> Result<TaggedValue> {
        Ok(TaggedValue::Time(u64::from_be_bytes(fixed(
            PrimitiveType::Time,
            bytes,
        )?)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VarintCodec;

impl ValueCodec for VarintCodec {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::Basic(PrimitiveType::Varint.into())
    }

    fn encode(&self, value: &TaggedValue, _version: ProtocolVersion) -> Result<Vec<u8>> {
        match value {
            TaggedValue::Varint(b) if b.is_empty() => {
                Err(Error::type_mismatch("varint", "empty varint"))
            }
            TaggedValue::Varint(b) => Ok(b.clone()),
            other => Err(mismatch(PrimitiveType::Varint, other)),
        }
    }

    fn decode(&self, bytes: &[u8], _version: ProtocolVersion) -> Result<TaggedValue> {
        if bytes.is_empty() {
            return Err(Error::malformed("varint", 1, 0));
        }
        Ok(TaggedValue::Varint(bytes.to_vec()))
    }
}

/// 4-byte scale followed by the unscaled varint
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalCodec;

impl ValueCodec for DecimalCodec {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::Basic(PrimitiveType::Decimal.into())
    }

    fn encode(&self, value: &TaggedValue, _version: ProtocolVersion) -> Result<Vec<u8>> {
        let TaggedValue::Decimal(decimal) = value else {
            return Err(mismatch(PrimitiveType::Decimal, value));
        };
        if decimal.unscaled.is_empty() {
            return Err(Error::type_mismatch("decimal", "decimal without unscaled value"));
        }
        let mut buf = Vec::with_capacity(4 + decimal.unscaled.len());
        buf.put_i32(decimal.scale);
        buf.put_slice(&decimal.unscaled);
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8], _version: ProtocolVersion) -> Result<TaggedValue> {
        if bytes.len() < 5 {
            return Err(Error::malformed("decimal", 5, bytes.len()));
        }
        let (scale, unscaled) = bytes.split_at(4);
        Ok(TaggedValue::Decimal(DecimalValue {
            scale: i32::from_be_bytes(fixed(PrimitiveType::Decimal, scale)?),
            unscaled: unscaled.to_vec(),
        }))
    }
}

/// Three zig-zag vints: months, days, nanoseconds
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationCodec;

impl DurationCodec {
    fn read_component<'a>(input: &'a [u8], name: &str) -> Result<(&'a [u8], i64)> {
        parse_vint(input)
            .map_err(|_| Error::corrupt("duration", format!("unreadable {} component", name)))
    }
}

impl ValueCodec for DurationCodec {
    fn type_spec(&self) -> TypeSpec {
        TypeSpec::Basic(PrimitiveType::Duration.into())
    }

    fn encode(&self, value: &TaggedValue, _version: ProtocolVersion) -> Result<Vec<u8>> {
        let TaggedValue::Duration(d) = value else {
            return Err(mismatch(PrimitiveType::Duration, value));
        };
        let signs = [i64::from(d.months), i64::from(d.days), d.nanos];
        if signs.iter().any(|c| *c < 0) && signs.iter().any(|c| *c > 0) {
            return Err(Error::type_mismatch(
                "duration with components of one sign",
                "mixed-sign duration",
            ));
        }
        let mut buf = encode_vint(i64::from(d.months));
        buf.extend_from_slice(&encode_vint(i64::from(d.days)));
        buf.extend_from_slice(&encode_vint(d.nanos));
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8], _version: ProtocolVersion) -> Result<TaggedValue> {
        let (rest, months) = Self::read_component(bytes, "months")?;
        let (rest, days) = Self::read_component(rest, "days")?;
        let (rest, nanos) = Self::read_component(rest, "nanoseconds")?;
        super::expect_consumed(rest, "duration")?;

        let months = i32::try_from(months)
            .map_err(|_| Error::corrupt("duration", "months exceed 32 bits"))?;
        let days =
            i32::try_from(days).map_err(|_| Error::corrupt("duration", "days exceed 32 bits"))?;
        Ok(TaggedValue::Duration(DurationValue {
            months,
            days,
            nanos,
        }))
    }
}

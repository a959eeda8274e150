//! Core data types for CQLBridge
//!
//! [`ColumnType`] is the catalog's description of a column's data kind and
//! [`TaggedValue`] is the gateway's wire value. Both are plain data: they are
//! built per request and dropped afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use uuid::Uuid;

/// Fixed-set primitive CQL kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Ascii,
    BigInt,
    Blob,
    Boolean,
    Counter,
    Date,
    Decimal,
    Double,
    Duration,
    Float,
    Inet,
    Int,
    SmallInt,
    Text,
    Time,
    Timestamp,
    TimeUuid,
    TinyInt,
    Uuid,
    Varchar,
    Varint,
}

impl PrimitiveType {
    /// All primitive kinds, in declaration order
    pub const ALL: [PrimitiveType; 21] = [
        PrimitiveType::Ascii,
        PrimitiveType::BigInt,
        PrimitiveType::Blob,
        PrimitiveType::Boolean,
        PrimitiveType::Counter,
        PrimitiveType::Date,
        PrimitiveType::Decimal,
        PrimitiveType::Double,
        PrimitiveType::Duration,
        PrimitiveType::Float,
        PrimitiveType::Inet,
        PrimitiveType::Int,
        PrimitiveType::SmallInt,
        PrimitiveType::Text,
        PrimitiveType::Time,
        PrimitiveType::Timestamp,
        PrimitiveType::TimeUuid,
        PrimitiveType::TinyInt,
        PrimitiveType::Uuid,
        PrimitiveType::Varchar,
        PrimitiveType::Varint,
    ];

    /// The CQL keyword for this kind
    pub fn cql_name(&self) -> &'static str {
        match self {
            PrimitiveType::Ascii => "ascii",
            PrimitiveType::BigInt => "bigint",
            PrimitiveType::Blob => "blob",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Counter => "counter",
            PrimitiveType::Date => "date",
            PrimitiveType::Decimal => "decimal",
            PrimitiveType::Double => "double",
            PrimitiveType::Duration => "duration",
            PrimitiveType::Float => "float",
            PrimitiveType::Inet => "inet",
            PrimitiveType::Int => "int",
            PrimitiveType::SmallInt => "smallint",
            PrimitiveType::Text => "text",
            PrimitiveType::Time => "time",
            PrimitiveType::Timestamp => "timestamp",
            PrimitiveType::TimeUuid => "timeuuid",
            PrimitiveType::TinyInt => "tinyint",
            PrimitiveType::Uuid => "uuid",
            PrimitiveType::Varchar => "varchar",
            PrimitiveType::Varint => "varint",
        }
    }

    /// Look up a kind by its CQL keyword (case insensitive)
    pub fn from_cql_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        Self::ALL.iter().copied().find(|kind| kind.cql_name() == lower)
    }

    /// Serialized width in bytes, for fixed-width kinds
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            PrimitiveType::Boolean | PrimitiveType::TinyInt => Some(1),
            PrimitiveType::SmallInt => Some(2),
            PrimitiveType::Int | PrimitiveType::Float | PrimitiveType::Date => Some(4),
            PrimitiveType::BigInt
            | PrimitiveType::Counter
            | PrimitiveType::Timestamp
            | PrimitiveType::Double
            | PrimitiveType::Time => Some(8),
            PrimitiveType::Uuid | PrimitiveType::TimeUuid => Some(16),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cql_name())
    }
}

/// One field of a user-defined type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UdtField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: ColumnType,
}

/// User-defined type definition with its fields in declared order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDefinedType {
    pub name: String,
    pub fields: Vec<UdtField>,
    #[serde(default)]
    pub frozen: bool,
}

impl UserDefinedType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            frozen: false,
        }
    }

    /// Append a field (builder style)
    pub fn with_field(mut self, name: impl Into<String>, field_type: impl Into<ColumnType>) -> Self {
        self.fields.push(UdtField {
            name: name.into(),
            field_type: field_type.into(),
        });
        self
    }

    pub fn frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }
}

/// Catalog description of a column's data kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Primitive(PrimitiveType),
    List(Box<ColumnType>),
    Set(Box<ColumnType>),
    Map(Box<ColumnType>, Box<ColumnType>),
    Tuple(Vec<ColumnType>),
    Udt(UserDefinedType),
    /// Opaque server-side type, identified only by its class name
    Custom(String),
}

impl ColumnType {
    pub fn list(element: impl Into<ColumnType>) -> Self {
        ColumnType::List(Box::new(element.into()))
    }

    pub fn set(element: impl Into<ColumnType>) -> Self {
        ColumnType::Set(Box::new(element.into()))
    }

    pub fn map(key: impl Into<ColumnType>, value: impl Into<ColumnType>) -> Self {
        ColumnType::Map(Box::new(key.into()), Box::new(value.into()))
    }

    pub fn tuple<I, T>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ColumnType>,
    {
        ColumnType::Tuple(elements.into_iter().map(Into::into).collect())
    }

    /// Check if this type is a collection (list, set or map)
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            ColumnType::List(_) | ColumnType::Set(_) | ColumnType::Map(_, _)
        )
    }
}

impl From<PrimitiveType> for ColumnType {
    fn from(kind: PrimitiveType) -> Self {
        ColumnType::Primitive(kind)
    }
}

impl From<UserDefinedType> for ColumnType {
    fn from(udt: UserDefinedType) -> Self {
        ColumnType::Udt(udt)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Primitive(kind) => write!(f, "{}", kind),
            ColumnType::List(element) => write!(f, "list<{}>", element),
            ColumnType::Set(element) => write!(f, "set<{}>", element),
            ColumnType::Map(key, value) => write!(f, "map<{}, {}>", key, value),
            ColumnType::Tuple(elements) => {
                write!(f, "tuple<")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, ">")
            }
            ColumnType::Udt(udt) if udt.frozen => write!(f, "frozen<{}>", udt.name),
            ColumnType::Udt(udt) => write!(f, "{}", udt.name),
            ColumnType::Custom(class_name) => write!(f, "'{}'", class_name),
        }
    }
}

/// Arbitrary-precision decimal: `unscaled * 10^-scale`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimalValue {
    pub scale: i32,
    /// Big-endian two's complement bytes of the unscaled value
    pub unscaled: Vec<u8>,
}

/// CQL duration; the three components are independent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationValue {
    pub months: i32,
    pub days: i32,
    pub nanos: i64,
}

/// Gateway wire value
///
/// Integer kinds (`tinyint` up to `bigint`, `counter`, `timestamp`) all travel
/// as [`TaggedValue::Int`]; the codec narrows and range-checks on encode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaggedValue {
    Null,
    /// Leave the bound column untouched
    Unset,
    Boolean(bool),
    Int(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Inet(IpAddr),
    /// Days since -5877641-06-23, with the Unix epoch at 2^31
    Date(u32),
    /// Nanoseconds since midnight
    Time(u64),
    /// Big-endian two's complement bytes
    Varint(Vec<u8>),
    Decimal(DecimalValue),
    Duration(DurationValue),
    List(Vec<TaggedValue>),
    Set(Vec<TaggedValue>),
    Map(Vec<(TaggedValue, TaggedValue)>),
    Tuple(Vec<TaggedValue>),
    Udt(BTreeMap<String, TaggedValue>),
}

impl TaggedValue {
    /// Short name of this value's variant, used in mismatch errors
    pub fn kind_name(&self) -> &'static str {
        match self {
            TaggedValue::Null => "null",
            TaggedValue::Unset => "unset",
            TaggedValue::Boolean(_) => "boolean",
            TaggedValue::Int(_) => "int",
            TaggedValue::Float(_) => "float",
            TaggedValue::Double(_) => "double",
            TaggedValue::String(_) => "string",
            TaggedValue::Bytes(_) => "bytes",
            TaggedValue::Uuid(_) => "uuid",
            TaggedValue::Inet(_) => "inet",
            TaggedValue::Date(_) => "date",
            TaggedValue::Time(_) => "time",
            TaggedValue::Varint(_) => "varint",
            TaggedValue::Decimal(_) => "decimal",
            TaggedValue::Duration(_) => "duration",
            TaggedValue::List(_) => "list",
            TaggedValue::Set(_) => "set",
            TaggedValue::Map(_) => "map",
            TaggedValue::Tuple(_) => "tuple",
            TaggedValue::Udt(_) => "udt",
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, TaggedValue::Null)
    }
}

/// Result of encoding a top-level bound value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue {
    Value(Vec<u8>),
    Null,
    Unset,
}

impl BoundValue {
    /// Serialized bytes, if this is a concrete value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            BoundValue::Value(bytes) => Some(bytes),
            BoundValue::Null | BoundValue::Unset => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_names_roundtrip() {
        for kind in PrimitiveType::ALL {
            assert_eq!(PrimitiveType::from_cql_name(kind.cql_name()), Some(kind));
        }
        assert_eq!(PrimitiveType::from_cql_name("BIGINT"), Some(PrimitiveType::BigInt));
        assert_eq!(PrimitiveType::from_cql_name("address"), None);
    }

    #[test]
    fn test_column_type_display() {
        let ty = ColumnType::map(
            PrimitiveType::Text,
            ColumnType::list(PrimitiveType::Int),
        );
        assert_eq!(ty.to_string(), "map<text, list<int>>");

        let udt = UserDefinedType::new("address")
            .with_field("street", PrimitiveType::Text)
            .frozen(true);
        assert_eq!(ColumnType::from(udt).to_string(), "frozen<address>");

        let tuple = ColumnType::tuple([PrimitiveType::Int, PrimitiveType::Text]);
        assert_eq!(tuple.to_string(), "tuple<int, text>");
        assert_eq!(
            ColumnType::Custom("org.example.Point".into()).to_string(),
            "'org.example.Point'"
        );
    }

    #[test]
    fn test_fixed_widths() {
        assert_eq!(PrimitiveType::Int.fixed_width(), Some(4));
        assert_eq!(PrimitiveType::BigInt.fixed_width(), Some(8));
        assert_eq!(PrimitiveType::TimeUuid.fixed_width(), Some(16));
        assert_eq!(PrimitiveType::Text.fixed_width(), None);
        assert_eq!(PrimitiveType::Decimal.fixed_width(), None);
    }

    #[test]
    fn test_column_type_serde() {
        let ty = ColumnType::set(PrimitiveType::Uuid);
        let json = serde_json::to_string(&ty).unwrap();
        assert_eq!(json, r#"{"set":{"primitive":"uuid"}}"#);
        let back: ColumnType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TaggedValue::Int(1).kind_name(), "int");
        assert_eq!(TaggedValue::Udt(BTreeMap::new()).kind_name(), "udt");
        assert!(TaggedValue::Null.is_null());
    }
}

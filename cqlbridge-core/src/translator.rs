//! Column type translation
//!
//! Converts the catalog's [`ColumnType`] into the wire type specification
//! ([`TypeSpec`]) that labels schema columns and tags decoded values.

use crate::types::{ColumnType, PrimitiveType, UserDefinedType};
use serde::Serialize;
use std::fmt;

/// CQL type identifiers as they appear in the native protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u16)]
pub enum CqlTypeId {
    Custom = 0x00,
    Ascii = 0x01,
    BigInt = 0x02,
    Blob = 0x03,
    Boolean = 0x04,
    Counter = 0x05,
    Decimal = 0x06,
    Double = 0x07,
    Float = 0x08,
    Int = 0x09,
    Text = 0x0A,
    Timestamp = 0x0B,
    Uuid = 0x0C,
    Varchar = 0x0D,
    Varint = 0x0E,
    Timeuuid = 0x0F,
    Inet = 0x10,
    Date = 0x11,
    Time = 0x12,
    Smallint = 0x13,
    Tinyint = 0x14,
    Duration = 0x15,
    List = 0x20,
    Map = 0x21,
    Set = 0x22,
    Udt = 0x30,
    Tuple = 0x31,
}

impl CqlTypeId {
    /// Lower-case protocol name of this type id
    pub fn name(&self) -> &'static str {
        match self {
            CqlTypeId::Custom => "custom",
            CqlTypeId::Ascii => "ascii",
            CqlTypeId::BigInt => "bigint",
            CqlTypeId::Blob => "blob",
            CqlTypeId::Boolean => "boolean",
            CqlTypeId::Counter => "counter",
            CqlTypeId::Decimal => "decimal",
            CqlTypeId::Double => "double",
            CqlTypeId::Float => "float",
            CqlTypeId::Int => "int",
            CqlTypeId::Text => "text",
            CqlTypeId::Timestamp => "timestamp",
            CqlTypeId::Uuid => "uuid",
            CqlTypeId::Varchar => "varchar",
            CqlTypeId::Varint => "varint",
            CqlTypeId::Timeuuid => "timeuuid",
            CqlTypeId::Inet => "inet",
            CqlTypeId::Date => "date",
            CqlTypeId::Time => "time",
            CqlTypeId::Smallint => "smallint",
            CqlTypeId::Tinyint => "tinyint",
            CqlTypeId::Duration => "duration",
            CqlTypeId::List => "list",
            CqlTypeId::Map => "map",
            CqlTypeId::Set => "set",
            CqlTypeId::Udt => "udt",
            CqlTypeId::Tuple => "tuple",
        }
    }
}

impl From<PrimitiveType> for CqlTypeId {
    fn from(kind: PrimitiveType) -> Self {
        match kind {
            PrimitiveType::Ascii => CqlTypeId::Ascii,
            PrimitiveType::BigInt => CqlTypeId::BigInt,
            PrimitiveType::Blob => CqlTypeId::Blob,
            PrimitiveType::Boolean => CqlTypeId::Boolean,
            PrimitiveType::Counter => CqlTypeId::Counter,
            PrimitiveType::Date => CqlTypeId::Date,
            PrimitiveType::Decimal => CqlTypeId::Decimal,
            PrimitiveType::Double => CqlTypeId::Double,
            PrimitiveType::Duration => CqlTypeId::Duration,
            PrimitiveType::Float => CqlTypeId::Float,
            PrimitiveType::Inet => CqlTypeId::Inet,
            PrimitiveType::Int => CqlTypeId::Int,
            PrimitiveType::SmallInt => CqlTypeId::Smallint,
            PrimitiveType::Text => CqlTypeId::Text,
            PrimitiveType::Time => CqlTypeId::Time,
            PrimitiveType::Timestamp => CqlTypeId::Timestamp,
            PrimitiveType::TimeUuid => CqlTypeId::Timeuuid,
            PrimitiveType::TinyInt => CqlTypeId::Tinyint,
            PrimitiveType::Uuid => CqlTypeId::Uuid,
            PrimitiveType::Varchar => CqlTypeId::Varchar,
            PrimitiveType::Varint => CqlTypeId::Varint,
        }
    }
}

/// A named field of a [`UdtSpec`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UdtFieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_spec: TypeSpec,
}

/// Wire description of a user-defined type; fields keep declared order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UdtSpec {
    pub name: String,
    pub fields: Vec<UdtFieldSpec>,
    pub frozen: bool,
}

/// Wire type specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSpec {
    Basic(CqlTypeId),
    List(Box<TypeSpec>),
    Set(Box<TypeSpec>),
    Map { key: Box<TypeSpec>, value: Box<TypeSpec> },
    Tuple(Vec<TypeSpec>),
    Udt(UdtSpec),
    /// Generic custom kind carrying the server-side class name verbatim
    Custom(String),
}

impl TypeSpec {
    /// Protocol option id of this type
    pub fn type_id(&self) -> CqlTypeId {
        match self {
            TypeSpec::Basic(id) => *id,
            TypeSpec::List(_) => CqlTypeId::List,
            TypeSpec::Set(_) => CqlTypeId::Set,
            TypeSpec::Map { .. } => CqlTypeId::Map,
            TypeSpec::Tuple(_) => CqlTypeId::Tuple,
            TypeSpec::Udt(_) => CqlTypeId::Udt,
            TypeSpec::Custom(_) => CqlTypeId::Custom,
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Basic(id) => f.write_str(id.name()),
            TypeSpec::List(element) => write!(f, "list<{}>", element),
            TypeSpec::Set(element) => write!(f, "set<{}>", element),
            TypeSpec::Map { key, value } => write!(f, "map<{}, {}>", key, value),
            TypeSpec::Tuple(elements) => {
                write!(f, "tuple<")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, ">")
            }
            TypeSpec::Udt(udt) if udt.frozen => write!(f, "frozen<{}>", udt.name),
            TypeSpec::Udt(udt) => f.write_str(&udt.name),
            TypeSpec::Custom(class_name) => write!(f, "'{}'", class_name),
        }
    }
}

/// Translate a catalog column type into its wire specification
pub fn translate(column_type: &ColumnType) -> TypeSpec {
    match column_type {
        ColumnType::Primitive(kind) => TypeSpec::Basic((*kind).into()),
        ColumnType::List(element) => TypeSpec::List(Box::new(translate(element))),
        ColumnType::Set(element) => TypeSpec::Set(Box::new(translate(element))),
        ColumnType::Map(key, value) => TypeSpec::Map {
            key: Box::new(translate(key)),
            value: Box::new(translate(value)),
        },
        ColumnType::Tuple(elements) => TypeSpec::Tuple(elements.iter().map(translate).collect()),
        ColumnType::Udt(udt) => TypeSpec::Udt(translate_udt(udt)),
        ColumnType::Custom(class_name) => TypeSpec::Custom(class_name.clone()),
    }
}

/// Translate a user-defined type, keeping its declared field order
pub fn translate_udt(udt: &UserDefinedType) -> UdtSpec {
    UdtSpec {
        name: udt.name.clone(),
        fields: udt
            .fields
            .iter()
            .map(|field| UdtFieldSpec {
                name: field.name.clone(),
                type_spec: translate(&field.field_type),
            })
            .collect(),
        frozen: udt.frozen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_translation() {
        assert_eq!(
            translate(&PrimitiveType::Int.into()),
            TypeSpec::Basic(CqlTypeId::Int)
        );
        assert_eq!(
            translate(&PrimitiveType::TimeUuid.into()),
            TypeSpec::Basic(CqlTypeId::Timeuuid)
        );
    }

    #[test]
    fn test_nested_translation_preserves_order() {
        let ty = ColumnType::map(
            PrimitiveType::Text,
            ColumnType::tuple([PrimitiveType::Int, PrimitiveType::Uuid, PrimitiveType::Blob]),
        );
        let spec = translate(&ty);
        assert_eq!(spec.type_id(), CqlTypeId::Map);
        assert_eq!(spec.to_string(), "map<text, tuple<int, uuid, blob>>");
    }

    #[test]
    fn test_udt_field_order() {
        let udt = UserDefinedType::new("address")
            .with_field("zip", PrimitiveType::Int)
            .with_field("city", PrimitiveType::Text)
            .with_field("street", PrimitiveType::Text)
            .frozen(true);
        match translate(&udt.into()) {
            TypeSpec::Udt(spec) => {
                let names: Vec<_> = spec.fields.iter().map(|f| f.name.as_str()).collect();
                assert_eq!(names, vec!["zip", "city", "street"]);
                assert!(spec.frozen);
            }
            other => panic!("Expected UDT spec, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_keeps_class_name() {
        let spec = translate(&ColumnType::Custom(
            "org.apache.cassandra.db.marshal.DynamicCompositeType".into(),
        ));
        assert_eq!(spec.type_id(), CqlTypeId::Custom);
        assert_eq!(
            spec,
            TypeSpec::Custom("org.apache.cassandra.db.marshal.DynamicCompositeType".into())
        );
    }

    #[test]
    fn test_type_spec_display_names() {
        assert_eq!(TypeSpec::Basic(CqlTypeId::BigInt).to_string(), "bigint");
        assert_eq!(TypeSpec::Basic(CqlTypeId::Smallint).to_string(), "smallint");
    }
}

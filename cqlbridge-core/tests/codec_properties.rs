//! Round-trip and boundary properties of the value codecs

use cqlbridge_core::{
    BoundValue, ColumnType, DecimalValue, DurationValue, Error, PrimitiveType, ProtocolVersion,
    StatusCode, TaggedValue, ValueCodec, ValueConverter, ValueSource,
};
use cqlbridge_core::codec::registry::codec_for;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::net::IpAddr;
use uuid::Uuid;

fn roundtrip(ty: &ColumnType, value: &TaggedValue, version: ProtocolVersion) -> TaggedValue {
    let codec = codec_for(ty).unwrap();
    let bytes = codec.encode(value, version).unwrap();
    codec.decode(&bytes, version).unwrap()
}

fn int_range(kind: PrimitiveType) -> std::ops::RangeInclusive<i64> {
    match kind {
        PrimitiveType::TinyInt => i64::from(i8::MIN)..=i64::from(i8::MAX),
        PrimitiveType::SmallInt => i64::from(i16::MIN)..=i64::from(i16::MAX),
        PrimitiveType::Int => i64::from(i32::MIN)..=i64::from(i32::MAX),
        _ => i64::MIN..=i64::MAX,
    }
}

/// Any value of the given primitive kind within its representable range
fn arb_primitive(kind: PrimitiveType) -> BoxedStrategy<TaggedValue> {
    match kind {
        PrimitiveType::TinyInt
        | PrimitiveType::SmallInt
        | PrimitiveType::Int
        | PrimitiveType::BigInt
        | PrimitiveType::Counter
        | PrimitiveType::Timestamp => int_range(kind).prop_map(TaggedValue::Int).boxed(),
        PrimitiveType::Boolean => any::<bool>().prop_map(TaggedValue::Boolean).boxed(),
        PrimitiveType::Float => any::<f32>()
            .prop_filter("NaN never compares equal", |f| !f.is_nan())
            .prop_map(TaggedValue::Float)
            .boxed(),
        PrimitiveType::Double => any::<f64>()
            .prop_filter("NaN never compares equal", |d| !d.is_nan())
            .prop_map(TaggedValue::Double)
            .boxed(),
        PrimitiveType::Ascii => "[ -~]{0,32}".prop_map(TaggedValue::String).boxed(),
        PrimitiveType::Text | PrimitiveType::Varchar => {
            any::<String>().prop_map(TaggedValue::String).boxed()
        }
        PrimitiveType::Blob => proptest::collection::vec(any::<u8>(), 0..64)
            .prop_map(TaggedValue::Bytes)
            .boxed(),
        PrimitiveType::Uuid => any::<[u8; 16]>()
            .prop_map(|b| TaggedValue::Uuid(Uuid::from_bytes(b)))
            .boxed(),
        PrimitiveType::TimeUuid => any::<[u8; 16]>()
            .prop_map(|mut b| {
                b[6] = (b[6] & 0x0F) | 0x10;
                b[8] = (b[8] & 0x3F) | 0x80;
                TaggedValue::Uuid(Uuid::from_bytes(b))
            })
            .boxed(),
        PrimitiveType::Inet => prop_oneof![
            any::<[u8; 4]>().prop_map(|b| TaggedValue::Inet(IpAddr::from(b))),
            any::<[u8; 16]>().prop_map(|b| TaggedValue::Inet(IpAddr::from(b))),
        ]
        .boxed(),
        PrimitiveType::Date => any::<u32>().prop_map(TaggedValue::Date).boxed(),
        PrimitiveType::Time => (0u64..=86_399_999_999_999)
            .prop_map(TaggedValue::Time)
            .boxed(),
        PrimitiveType::Varint => proptest::collection::vec(any::<u8>(), 1..24)
            .prop_map(TaggedValue::Varint)
            .boxed(),
        PrimitiveType::Decimal => (any::<i32>(), proptest::collection::vec(any::<u8>(), 1..24))
            .prop_map(|(scale, unscaled)| TaggedValue::Decimal(DecimalValue { scale, unscaled }))
            .boxed(),
        PrimitiveType::Duration => (0..=i32::MAX, 0..=i32::MAX, 0..=i64::MAX, any::<bool>())
            .prop_map(|(months, days, nanos, negative)| {
                let sign = if negative { -1 } else { 1 };
                TaggedValue::Duration(DurationValue {
                    months: months * sign,
                    days: days * sign,
                    nanos: nanos * i64::from(sign),
                })
            })
            .boxed(),
    }
}

fn arb_kind_and_value() -> impl Strategy<Value = (PrimitiveType, TaggedValue)> {
    proptest::sample::select(PrimitiveType::ALL.to_vec())
        .prop_flat_map(|kind| arb_primitive(kind).prop_map(move |v| (kind, v)))
}

proptest! {
    #[test]
    fn primitive_roundtrip((kind, value) in arb_kind_and_value()) {
        let ty = ColumnType::Primitive(kind);
        prop_assert_eq!(roundtrip(&ty, &value, ProtocolVersion::V4), value);
    }

    #[test]
    fn any_four_bytes_decode_as_int(bytes in any::<[u8; 4]>()) {
        let codec = codec_for(&PrimitiveType::Int.into()).unwrap();
        prop_assert!(codec.decode(&bytes, ProtocolVersion::V4).is_ok());
    }

    #[test]
    fn int_lists_keep_order(values in proptest::collection::vec(any::<i32>(), 0..32)) {
        let ty = ColumnType::list(PrimitiveType::Int);
        let value = TaggedValue::List(values.iter().map(|v| TaggedValue::Int(i64::from(*v))).collect());
        for version in [ProtocolVersion::V2, ProtocolVersion::V3, ProtocolVersion::V4, ProtocolVersion::V5] {
            prop_assert_eq!(roundtrip(&ty, &value, version), value.clone());
        }
    }

    #[test]
    fn text_maps_keep_pair_order(
        pairs in proptest::collection::vec(("[a-z]{1,8}", any::<i64>()), 0..16)
    ) {
        let ty = ColumnType::map(PrimitiveType::Text, PrimitiveType::BigInt);
        let value = TaggedValue::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (TaggedValue::String(k), TaggedValue::Int(v)))
                .collect(),
        );
        prop_assert_eq!(roundtrip(&ty, &value, ProtocolVersion::V4), value);
    }
}

#[test]
fn test_three_element_list() {
    let ty = ColumnType::list(PrimitiveType::Int);
    let value = TaggedValue::List(vec![
        TaggedValue::Int(3),
        TaggedValue::Int(1),
        TaggedValue::Int(2),
    ]);
    assert_eq!(roundtrip(&ty, &value, ProtocolVersion::V4), value);
}

#[test]
fn test_int32_boundaries() {
    let codec = codec_for(&PrimitiveType::Int.into()).unwrap();
    let v4 = ProtocolVersion::V4;

    assert!(codec.encode(&TaggedValue::Int(i64::from(i32::MAX)), v4).is_ok());
    assert!(codec.encode(&TaggedValue::Int(i64::from(i32::MIN)), v4).is_ok());
    for out_of_range in [i64::from(i32::MAX) + 1, i64::from(i32::MIN) - 1] {
        assert_eq!(
            codec.encode(&TaggedValue::Int(out_of_range), v4).unwrap_err(),
            Error::out_of_range("int", i32::MIN, i32::MAX)
        );
    }
}

#[test]
fn test_int32_wrong_length() {
    let codec = codec_for(&PrimitiveType::Int.into()).unwrap();
    for bytes in [&[0u8; 3][..], &[0u8; 5][..]] {
        assert!(matches!(
            codec.decode(bytes, ProtocolVersion::V4),
            Err(Error::MalformedValue { expected: 4, .. })
        ));
    }
}

#[test]
fn test_map_count_larger_than_pairs_fails() {
    let converter = ValueConverter::default();
    let ty = ColumnType::map(PrimitiveType::Int, PrimitiveType::Int);
    let bytes = [
        0, 0, 0, 2, // two pairs declared
        0, 0, 0, 4, 0, 0, 0, 1, // key
        0, 0, 0, 4, 0, 0, 0, 2, // value
    ];
    let status = converter
        .from_wire(&bytes, &ty, ValueSource::Store)
        .unwrap_err();
    assert_eq!(status.code, StatusCode::Internal);
    assert!(status.message.contains("map<int, int>"));
}

#[test]
fn test_udt_in_collection_roundtrip() {
    let address = cqlbridge_core::UserDefinedType::new("address")
        .with_field("street", PrimitiveType::Text)
        .with_field("tags", ColumnType::set(PrimitiveType::Ascii))
        .frozen(true);
    let ty = ColumnType::list(ColumnType::Udt(address));

    let mut first = BTreeMap::new();
    first.insert("street".to_string(), TaggedValue::String("Main".into()));
    first.insert(
        "tags".to_string(),
        TaggedValue::Set(vec![TaggedValue::String("home".into())]),
    );
    let mut second = BTreeMap::new();
    second.insert("street".to_string(), TaggedValue::Null);
    second.insert("tags".to_string(), TaggedValue::Null);

    let value = TaggedValue::List(vec![TaggedValue::Udt(first), TaggedValue::Udt(second)]);
    assert_eq!(roundtrip(&ty, &value, ProtocolVersion::V4), value);
}

#[test]
fn test_converter_markers_survive() {
    let converter = ValueConverter::default();
    let ty = ColumnType::Custom("org.example.Opaque".into());
    assert_eq!(
        converter.to_wire(&TaggedValue::Unset, &ty).unwrap(),
        BoundValue::Unset
    );
    let status = converter
        .to_wire(&TaggedValue::Bytes(vec![1]), &ty)
        .unwrap_err();
    assert_eq!(status.code, StatusCode::InvalidArgument);
}

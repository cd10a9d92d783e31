//! Tests for the shape, record and codec engine

use std::sync::Arc;

use crate::error::Error;
use crate::{codec, FieldType, ScalarKind, ScalarType, ScalarValue, Shape, ShapeBuilder, Value};

fn range_shape() -> Arc<Shape> {
    ShapeBuilder::new("Range")
        .field("begin", FieldType::uint64())
        .field("end", FieldType::uint64())
        .build()
        .unwrap()
}

#[test]
fn scalar_kind_byte_widths() {
    assert_eq!(ScalarKind::Int8.byte_width(), 1);
    assert_eq!(ScalarKind::UInt8.byte_width(), 1);
    assert_eq!(ScalarKind::Int16.byte_width(), 2);
    assert_eq!(ScalarKind::UInt16.byte_width(), 2);
    assert_eq!(ScalarKind::Int32.byte_width(), 4);
    assert_eq!(ScalarKind::UInt32.byte_width(), 4);
    assert_eq!(ScalarKind::Int64.byte_width(), 8);
    assert_eq!(ScalarKind::UInt64.byte_width(), 8);
    assert_eq!(ScalarKind::Float32.byte_width(), 4);
    assert_eq!(ScalarKind::Float64.byte_width(), 8);
}

#[test]
fn scalar_validate_accepts_values_at_limits() {
    let u8_ty = ScalarType::new(ScalarKind::UInt8);
    assert!(u8_ty.validate(&ScalarValue::Int(0)).is_ok());
    assert!(u8_ty.validate(&ScalarValue::Int(255)).is_ok());

    let i8_ty = ScalarType::new(ScalarKind::Int8);
    assert!(i8_ty.validate(&ScalarValue::Int(-128)).is_ok());
    assert!(i8_ty.validate(&ScalarValue::Int(127)).is_ok());

    let u64_ty = ScalarType::new(ScalarKind::UInt64);
    assert!(u64_ty.validate(&ScalarValue::Int(u64::MAX as i128)).is_ok());
}

#[test]
fn scalar_validate_rejects_out_of_range() {
    let u8_ty = ScalarType::new(ScalarKind::UInt8);
    assert!(matches!(
        u8_ty.validate(&ScalarValue::Int(256)),
        Err(Error::Range { .. })
    ));
    assert!(matches!(
        u8_ty.validate(&ScalarValue::Int(-1)),
        Err(Error::Range { .. })
    ));

    let i8_ty = ScalarType::new(ScalarKind::Int8);
    assert!(matches!(
        i8_ty.validate(&ScalarValue::Int(-129)),
        Err(Error::Range { .. })
    ));
}

#[test]
fn scalar_validate_rejects_kind_mismatch() {
    let int_ty = ScalarType::new(ScalarKind::Int32);
    assert!(matches!(
        int_ty.validate(&ScalarValue::Float(1.5)),
        Err(Error::Kind { .. })
    ));
}

#[test]
fn float_kinds_accept_integers_and_specials() {
    let f32_ty = ScalarType::new(ScalarKind::Float32);
    assert!(f32_ty.validate(&ScalarValue::Int(42)).is_ok());
    assert!(f32_ty.validate(&ScalarValue::Float(f64::INFINITY)).is_ok());
    assert!(f32_ty
        .validate(&ScalarValue::Float(f64::NEG_INFINITY))
        .is_ok());
    assert!(f32_ty.validate(&ScalarValue::Float(f64::NAN)).is_ok());
}

#[test]
fn float32_rejects_finite_values_beyond_f32_range() {
    let f32_ty = ScalarType::new(ScalarKind::Float32);
    assert!(matches!(
        f32_ty.validate(&ScalarValue::Float(f64::MAX)),
        Err(Error::Range { .. })
    ));
}

#[test]
fn scalar_default_must_be_in_range() {
    assert!(matches!(
        ScalarType::with_default(ScalarKind::UInt8, ScalarValue::Int(300)),
        Err(Error::Range { .. })
    ));
    let ok = ScalarType::with_default(ScalarKind::UInt8, ScalarValue::Int(7)).unwrap();
    assert_eq!(ok.default_value(), ScalarValue::Int(7));
}

#[test]
fn configured_scalar_default_materializes_on_instantiate() {
    let shape = ShapeBuilder::new("Header")
        .field("signature", FieldType::uint64_with(0x12345678))
        .field("count", FieldType::uint64_with(1))
        .build()
        .unwrap();

    let rec = shape.instantiate();
    assert_eq!(rec.get_int("signature").unwrap(), 0x12345678);
    assert_eq!(rec.get_int("count").unwrap(), 1);
}

#[test]
fn integers_assigned_to_float_fields_are_coerced() {
    let shape = ShapeBuilder::new("S")
        .field("hz", FieldType::float64())
        .build()
        .unwrap();

    let mut rec = shape.instantiate();
    rec.set("hz", 3u64).unwrap();
    assert_eq!(rec.get_float("hz").unwrap(), 3.0);
}

#[test]
fn shape_build_rejects_duplicate_field_names() {
    let result = ShapeBuilder::new("Dup")
        .field("a", FieldType::uint8())
        .field("a", FieldType::uint8())
        .build();
    assert!(matches!(result, Err(Error::DuplicateField { .. })));
}

#[test]
fn shape_build_checks_expected_size() {
    let result = ShapeBuilder::new("Sized")
        .field("a", FieldType::uint32())
        .expected_size(8)
        .build();
    assert!(matches!(
        result,
        Err(Error::SizeMismatch {
            computed: 4,
            declared: 8,
            ..
        })
    ));

    let ok = ShapeBuilder::new("Sized")
        .field("a", FieldType::uint32())
        .expected_size(4)
        .build();
    assert!(ok.is_ok());
}

#[test]
fn shape_layout_tokens_follow_declaration_order() {
    let shape = ShapeBuilder::new("Mixed")
        .field("a", FieldType::uint8())
        .field("b", FieldType::int32())
        .field("c", FieldType::float64())
        .build()
        .unwrap();

    assert_eq!(
        shape.layout().tokens(),
        &[ScalarKind::UInt8, ScalarKind::Int32, ScalarKind::Float64]
    );
    assert_eq!(shape.encoded_len(), 13);
}

#[test]
fn struct_field_contributes_nested_descriptor() {
    let range = range_shape();
    let shape = ShapeBuilder::new("Wrap")
        .field("tag", FieldType::uint8())
        .field("r", FieldType::shape(&range))
        .build()
        .unwrap();

    assert_eq!(
        shape.layout().tokens(),
        &[ScalarKind::UInt8, ScalarKind::UInt64, ScalarKind::UInt64]
    );
    assert_eq!(shape.encoded_len(), 17);
}

#[test]
fn instantiate_with_unknown_field_is_rejected() {
    let range = range_shape();
    let result = range.instantiate_with([("nope", Value::from(1u64))]);
    assert!(matches!(result, Err(Error::UnknownField { .. })));
}

#[test]
fn set_unknown_field_is_rejected() {
    let range = range_shape();
    let mut rec = range.instantiate();
    assert!(matches!(
        rec.set("nope", 1u64),
        Err(Error::UnknownField { .. })
    ));
}

#[test]
fn rejected_assignment_leaves_prior_value_intact() {
    let shape = ShapeBuilder::new("S")
        .field("v", FieldType::uint8())
        .build()
        .unwrap();

    let mut rec = shape.instantiate();
    rec.set("v", 10u8).unwrap();
    assert!(rec.set("v", 300u64).is_err());
    assert_eq!(rec.get_int("v").unwrap(), 10);
}

#[test]
fn range_encodes_to_little_endian_golden_bytes() {
    let range = range_shape();
    let rec = range
        .instantiate_with([("begin", Value::from(1u64)), ("end", Value::from(2u64))])
        .unwrap();

    let bytes = rec.encode().unwrap();
    assert_eq!(
        bytes,
        vec![
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
            0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]
    );

    let back = range.decode(&bytes).unwrap();
    assert_eq!(back.get_int("begin").unwrap(), 1);
    assert_eq!(back.get_int("end").unwrap(), 2);
    assert_eq!(back, rec);
}

#[test]
fn encoded_length_matches_shape_for_every_instance() {
    let range = range_shape();
    let rec = range.instantiate();
    assert_eq!(rec.encode().unwrap().len(), range.encoded_len());
}

#[test]
fn array_of_structs_flattens_field_then_element_order() {
    let range = range_shape();
    let foo = ShapeBuilder::new("Foo")
        .field("ranges", FieldType::array(FieldType::shape(&range), 3))
        .build()
        .unwrap();

    assert_eq!(foo.encoded_len(), 3 * range.encoded_len());

    let mut rec = foo.instantiate();
    let elems: Vec<Value> = (0..3u64)
        .map(|i| {
            Value::from(
                range
                    .instantiate_with([
                        ("begin", Value::from(2 * i + 1)),
                        ("end", Value::from(2 * i + 2)),
                    ])
                    .unwrap(),
            )
        })
        .collect();
    rec.set("ranges", elems).unwrap();

    let flat: Vec<i128> = rec.flatten().iter().map(|v| v.as_int().unwrap()).collect();
    assert_eq!(flat, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn array_assignment_requires_exact_length() {
    let shape = ShapeBuilder::new("S")
        .field("a", FieldType::array(FieldType::uint8(), 4))
        .build()
        .unwrap();

    let mut rec = shape.instantiate();
    let short = vec![Value::from(1u8); 3];
    assert!(matches!(
        rec.set("a", short),
        Err(Error::Length {
            expected: 4,
            got: 3
        })
    ));

    let long = vec![Value::from(1u8); 5];
    assert!(matches!(rec.set("a", long), Err(Error::Length { .. })));

    let exact = vec![Value::from(1u8); 4];
    assert!(rec.set("a", exact).is_ok());
}

#[test]
fn array_rejects_non_sequence_values() {
    let shape = ShapeBuilder::new("S")
        .field("a", FieldType::array(FieldType::uint8(), 4))
        .build()
        .unwrap();

    let mut rec = shape.instantiate();
    assert!(matches!(rec.set("a", 1u8), Err(Error::Shape { .. })));
}

#[test]
fn array_element_assignment_validates_value_and_bounds() {
    let shape = ShapeBuilder::new("S")
        .field("a", FieldType::array(FieldType::uint8(), 4))
        .build()
        .unwrap();

    let mut rec = shape.instantiate();
    rec.set_elem("a", 2, 9u8).unwrap();
    assert_eq!(rec.get("a").unwrap().as_array().unwrap()[2].as_int(), Some(9));

    assert!(matches!(
        rec.set_elem("a", 4, 1u8),
        Err(Error::Length { .. })
    ));
    assert!(matches!(
        rec.set_elem("a", 0, 300u64),
        Err(Error::Range { .. })
    ));
}

#[test]
fn slice_assignment_requires_matching_length() {
    let shape = ShapeBuilder::new("S")
        .field("a", FieldType::array(FieldType::uint8(), 4))
        .build()
        .unwrap();

    let mut rec = shape.instantiate();
    rec.set_slice("a", 1..3, &[Value::from(7u8), Value::from(8u8)])
        .unwrap();
    let elems = rec.get("a").unwrap().as_array().unwrap().to_vec();
    assert_eq!(elems[1].as_int(), Some(7));
    assert_eq!(elems[2].as_int(), Some(8));

    assert!(matches!(
        rec.set_slice("a", 1..3, &[Value::from(7u8)]),
        Err(Error::Length { .. })
    ));
    assert!(matches!(
        rec.set_slice("a", 2..5, &vec![Value::from(1u8); 3]),
        Err(Error::Length { .. })
    ));
}

#[test]
fn byte_arrays_accept_short_byte_input_zero_padded() {
    let shape = ShapeBuilder::new("S")
        .field("a", FieldType::array(FieldType::uint8(), 4))
        .build()
        .unwrap();

    let mut rec = shape.instantiate();
    rec.set_bytes("a", b"ab").unwrap();
    assert!(rec.bytes_eq("a", b"ab\x00\x00").unwrap());

    assert!(matches!(
        rec.set_bytes("a", b"abcde"),
        Err(Error::Length { .. })
    ));
}

#[test]
fn text_field_round_trips_and_strips_trailing_zeros() {
    let shape = ShapeBuilder::new("S")
        .field("name", FieldType::text(8))
        .build()
        .unwrap();

    let mut rec = shape.instantiate();
    assert_eq!(rec.get_text("name").unwrap(), "");

    rec.set_text("name", "hello").unwrap();
    assert_eq!(rec.get_text("name").unwrap(), "hello");
    assert_eq!(rec.encode().unwrap(), b"hello\x00\x00\x00");
}

#[test]
fn text_equality_pads_comparison_to_declared_length() {
    let shape = ShapeBuilder::new("S")
        .field("name", FieldType::text(5))
        .build()
        .unwrap();

    let mut rec = shape.instantiate();
    rec.set_bytes("name", b"ab").unwrap();

    assert!(rec.text_eq("name", "ab").unwrap());
    assert!(rec.bytes_eq("name", b"ab\x00\x00\x00").unwrap());
    assert!(rec.bytes_eq("name", b"ab\x00").unwrap());
    assert!(!rec.text_eq("name", "abc").unwrap());
}

#[test]
fn text_decode_fails_on_invalid_utf8() {
    let shape = ShapeBuilder::new("S")
        .field("name", FieldType::text(4))
        .build()
        .unwrap();

    let mut rec = shape.instantiate();
    rec.set_bytes("name", &[0xFF, 0xFE]).unwrap();
    assert!(matches!(
        rec.get_text("name"),
        Err(Error::Decode { .. })
    ));
}

#[test]
fn struct_assignment_requires_identical_shape() {
    let range = range_shape();
    let other = ShapeBuilder::new("Other")
        .field("begin", FieldType::uint64())
        .field("end", FieldType::uint64())
        .build()
        .unwrap();

    let foo = ShapeBuilder::new("Foo")
        .field("r", FieldType::shape(&range))
        .build()
        .unwrap();

    let mut rec = foo.instantiate();
    assert!(matches!(
        rec.set("r", other.instantiate()),
        Err(Error::ShapeMismatch { .. })
    ));
    assert!(rec.set("r", range.instantiate()).is_ok());
}

#[test]
fn struct_assignment_stores_a_deep_copy() {
    let range = range_shape();
    let foo = ShapeBuilder::new("Foo")
        .field("r", FieldType::shape(&range))
        .build()
        .unwrap();

    let mut src = range
        .instantiate_with([("begin", Value::from(1u64))])
        .unwrap();
    let mut rec = foo.instantiate();
    rec.set("r", src.clone()).unwrap();

    src.set("begin", 9u64).unwrap();
    let stored = rec.get("r").unwrap().as_struct().unwrap();
    assert_eq!(stored.get_int("begin").unwrap(), 1);
}

#[test]
fn struct_prototype_default_carries_configured_values() {
    let range = range_shape();
    let proto = range
        .instantiate_with([("begin", Value::from(1u64)), ("end", Value::from(2u64))])
        .unwrap();

    let foo = ShapeBuilder::new("Foo")
        .field("r", FieldType::record(proto))
        .build()
        .unwrap();

    let rec = foo.instantiate();
    let r = rec.get("r").unwrap().as_struct().unwrap();
    assert_eq!(r.get_int("begin").unwrap(), 1);
    assert_eq!(r.get_int("end").unwrap(), 2);
}

#[test]
fn decode_rejects_short_input_with_underflow() {
    let range = range_shape();
    let bytes = vec![0u8; 10];
    assert!(matches!(
        range.decode(&bytes),
        Err(Error::Underflow { .. })
    ));
}

#[test]
fn decode_rejects_oversized_buffers_but_decode_at_allows_trailing() {
    let range = range_shape();
    let mut bytes = vec![0u8; 20];
    bytes[0] = 5;

    assert!(matches!(range.decode(&bytes), Err(Error::Length { .. })));

    let rec = range.decode_at(&bytes, 0).unwrap();
    assert_eq!(rec.get_int("begin").unwrap(), 5);
}

#[test]
fn decode_at_reads_from_offset() {
    let range = range_shape();
    let rec = range
        .instantiate_with([("begin", Value::from(7u64)), ("end", Value::from(8u64))])
        .unwrap();

    let mut buf = vec![0xAA; 4];
    buf.extend(rec.encode().unwrap());

    let back = range.decode_at(&buf, 4).unwrap();
    assert_eq!(back, rec);
}

#[test]
fn unflatten_underflows_on_short_primitive_sequence() {
    let range = range_shape();
    assert!(matches!(
        range.unflatten(&[ScalarValue::Int(1)]),
        Err(Error::Underflow { .. })
    ));
}

#[test]
fn pack_rejects_value_count_mismatch() {
    let range = range_shape();
    let result = codec::pack(range.layout(), &[ScalarValue::Int(1)]);
    assert!(matches!(result, Err(Error::Length { .. })));
}

#[test]
fn signed_and_float_scalars_round_trip() {
    let shape = ShapeBuilder::new("S")
        .field("i", FieldType::int16())
        .field("j", FieldType::int64())
        .field("f", FieldType::float32())
        .field("g", FieldType::float64())
        .build()
        .unwrap();

    let mut rec = shape.instantiate();
    rec.set("i", -1234i16).unwrap();
    rec.set("j", i64::MIN).unwrap();
    rec.set("f", 1.5f32).unwrap();
    rec.set("g", -2.25f64).unwrap();

    let back = shape.decode(&rec.encode().unwrap()).unwrap();
    assert_eq!(back.get_int("i").unwrap(), -1234);
    assert_eq!(back.get_int("j").unwrap(), i64::MIN as i128);
    assert_eq!(back.get_float("f").unwrap(), 1.5);
    assert_eq!(back.get_float("g").unwrap(), -2.25);
    assert_eq!(back, rec);
}

#[test]
fn record_debug_renders_shape_and_fields() {
    let range = range_shape();
    let rec = range
        .instantiate_with([("begin", Value::from(1u64)), ("end", Value::from(2u64))])
        .unwrap();

    let repr = format!("{rec:?}");
    assert_eq!(repr, "Range { begin: 1, end: 2 }");
}

//! Shape build, flatten and codec benchmarks for fixrec
//!
//! These benchmarks measure the cost of the operations on the hot path of
//! any user of the crate: building shapes, assigning fields, and running a
//! record through encode and decode.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fixrec::{FieldType, Shape, ShapeBuilder, Value};

fn range_shape() -> Arc<Shape> {
    ShapeBuilder::new("Range")
        .field("begin", FieldType::uint64())
        .field("end", FieldType::uint64())
        .build()
        .unwrap()
}

fn nested_shape() -> Arc<Shape> {
    let range = range_shape();
    ShapeBuilder::new("Frame")
        .field("seq", FieldType::uint32())
        .field("label", FieldType::text(16))
        .field("ranges", FieldType::array(FieldType::shape(&range), 8))
        .field("gain", FieldType::float64())
        .build()
        .unwrap()
}

fn bench_shape_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("shape_build");

    group.bench_function("flat_two_fields", |b| {
        b.iter(|| black_box(range_shape()));
    });

    group.bench_function("nested_with_array", |b| {
        b.iter(|| black_box(nested_shape()));
    });

    group.finish();
}

fn bench_field_assignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_assignment");
    let range = range_shape();

    group.bench_function("set_scalar", |b| {
        let mut rec = range.instantiate();
        b.iter(|| rec.set("begin", black_box(42u64)).unwrap());
    });

    group.bench_function("set_text", |b| {
        let shape = nested_shape();
        let mut rec = shape.instantiate();
        b.iter(|| rec.set_text("label", black_box("frame-0001")).unwrap());
    });

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let shape = nested_shape();

    let mut rec = shape.instantiate();
    rec.set("seq", 7u32).unwrap();
    rec.set_text("label", "frame-0001").unwrap();
    rec.set("gain", 0.5f64).unwrap();
    let bytes = rec.encode().unwrap();

    group.bench_function("flatten", |b| {
        b.iter(|| black_box(rec.flatten()));
    });

    group.bench_function("encode", |b| {
        b.iter(|| black_box(rec.encode().unwrap()));
    });

    group.bench_function("decode", |b| {
        b.iter(|| black_box(shape.decode(&bytes).unwrap()));
    });

    group.finish();
}

fn bench_instantiate(c: &mut Criterion) {
    let mut group = c.benchmark_group("instantiate");
    let shape = nested_shape();

    group.bench_function("defaults", |b| {
        b.iter(|| black_box(shape.instantiate()));
    });

    group.bench_function("with_overrides", |b| {
        b.iter(|| {
            black_box(
                shape
                    .instantiate_with([("seq", Value::from(1u32)), ("gain", Value::from(2.0f64))])
                    .unwrap(),
            )
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_shape_build,
    bench_field_assignment,
    bench_codec,
    bench_instantiate
);
criterion_main!(benches);

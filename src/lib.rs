//! # fixrec - Fixed-Layout Binary Records
//!
//! fixrec lets a program declare fixed-layout binary records (akin to C
//! structs) as ordered sets of typed fields, serialize instances to a
//! contiguous byte buffer, and reconstruct instances from such a buffer,
//! with field-level range and type validation on every mutation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use fixrec::{FieldType, ShapeBuilder, Value};
//!
//! let range = ShapeBuilder::new("Range")
//!     .field("begin", FieldType::uint64())
//!     .field("end", FieldType::uint64())
//!     .expected_size(16)
//!     .build()?;
//!
//! let r = range.instantiate_with([
//!     ("begin", Value::from(1u64)),
//!     ("end", Value::from(2u64)),
//! ])?;
//!
//! let bytes = r.encode()?;            // 16 bytes, little-endian
//! let back = range.decode(&bytes)?;   // field-for-field equal to r
//! assert_eq!(r, back);
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! declare shape          encode                          decode
//! +-------------+   +-----------------+            +-----------------+
//! | ShapeBuilder|-->| flatten instance|--> pack -->| unpack bytes    |
//! | (fields in  |   | to primitive    |    (LE,    | per layout,     |
//! |  decl order)|   | sequence        |  no pad)   | unflatten +     |
//! +-------------+   +-----------------+            | validate        |
//!       |                                          +-----------------+
//!       v
//!  layout descriptor: one token per leaf scalar, derived once at build
//! ```
//!
//! ## Type System
//!
//! | Variant | Contents | Layout contribution |
//! |---------|----------|---------------------|
//! | Scalar | int 8/16/32/64 signed/unsigned, float 32/64 | 1 token |
//! | Array | element type + fixed length N | N x element contribution |
//! | Text | N null-padded bytes | N UInt8 tokens |
//! | Struct | nested shape prototype | nested shape's descriptor |
//!
//! ## Guarantees
//!
//! - Every stored field value is valid for its type at all times; rejected
//!   assignments never mutate.
//! - `encode(r).len() == shape.encoded_len()` for every instance.
//! - `decode(encode(r)) == r` field-for-field.
//! - Shapes are immutable after build and shareable across threads via `Arc`
//!   with no synchronization.
//!
//! ## Module Overview
//!
//! - [`scalar`]: scalar kinds, values, and range-validated scalar types
//! - [`array`] / [`text`]: fixed-length sequence types
//! - [`field`]: the closed field type union and field descriptors
//! - [`shape`]: shape building and layout derivation
//! - [`record`]: record instances and the validated mutation surface
//! - [`codec`]: little-endian pack/unpack of primitive sequences

pub mod array;
pub mod codec;
pub mod error;
pub mod field;
mod flatten;
pub mod record;
pub mod scalar;
pub mod shape;
pub mod text;

#[cfg(test)]
mod tests;

pub use array::ArrayType;
pub use error::{Error, Result};
pub use field::{FieldDef, FieldType};
pub use record::{Record, Value};
pub use scalar::{ScalarKind, ScalarType, ScalarValue};
pub use shape::{Layout, Shape, ShapeBuilder};
pub use text::TextType;

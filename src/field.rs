//! # Field Descriptors and the Type Union
//!
//! [`FieldType`] is the closed tagged union over every kind of field a shape
//! can declare: scalar, fixed array, fixed text, nested struct. Every
//! capability the composition engine needs (validate, default, layout
//! contribution) dispatches on this enum; there is no dynamic type
//! inspection anywhere.
//!
//! The `Struct` variant holds a prototype record whose current values are the
//! field's default, so a shape can declare a nested struct field that starts
//! life pre-populated:
//!
//! ```ignore
//! let foo = ShapeBuilder::new("Foo")
//!     .field("r", FieldType::record(range.instantiate_with([
//!         ("begin", Value::from(1u64)),
//!         ("end", Value::from(2u64)),
//!     ])?))
//!     .build()?;
//! ```
//!
//! [`FieldDef`] binds a name to a type; its identity is the name, unique
//! within one shape and immutable once the shape builds.

use std::sync::Arc;

use crate::array::ArrayType;
use crate::error::{Error, Result};
use crate::record::{Record, Value};
use crate::scalar::{ScalarKind, ScalarType, ScalarValue};
use crate::shape::Shape;
use crate::text::TextType;

/// Closed union of every declarable field type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Scalar(ScalarType),
    Array(ArrayType),
    Text(TextType),
    /// Nested struct field; the prototype's values are the field default.
    Struct(Record),
}

macro_rules! scalar_ctors {
    ($($name:ident, $with:ident, $native:ty, $kind:ident, $wrap:ident;)*) => {
        $(
            pub fn $name() -> Self {
                FieldType::Scalar(ScalarType::new(ScalarKind::$kind))
            }

            /// Same kind with a configured default. The typed parameter
            /// cannot be out of range.
            pub fn $with(default: $native) -> Self {
                FieldType::Scalar(ScalarType::raw(
                    ScalarKind::$kind,
                    ScalarValue::$wrap(default as _),
                ))
            }
        )*
    };
}

impl FieldType {
    scalar_ctors! {
        int8, int8_with, i8, Int8, Int;
        uint8, uint8_with, u8, UInt8, Int;
        int16, int16_with, i16, Int16, Int;
        uint16, uint16_with, u16, UInt16, Int;
        int32, int32_with, i32, Int32, Int;
        uint32, uint32_with, u32, UInt32, Int;
        int64, int64_with, i64, Int64, Int;
        uint64, uint64_with, u64, UInt64, Int;
        float32, float32_with, f32, Float32, Float;
        float64, float64_with, f64, Float64, Float;
    }

    pub fn array(elem: FieldType, len: usize) -> Self {
        FieldType::Array(ArrayType::new(elem, len))
    }

    pub fn text(len: usize) -> Self {
        FieldType::Text(TextType::new(len))
    }

    /// Struct field whose default is the given prototype instance.
    pub fn record(proto: Record) -> Self {
        FieldType::Struct(proto)
    }

    /// Struct field defaulting to the shape's all-default instance.
    pub fn shape(shape: &Arc<Shape>) -> Self {
        FieldType::Struct(shape.instantiate())
    }

    pub fn validate(&self, v: &Value) -> Result<()> {
        match self {
            FieldType::Scalar(s) => match v {
                Value::Scalar(sv) => s.validate(sv),
                other => Err(Error::Shape {
                    expected: if s.kind().is_float() { "float" } else { "integer" },
                    got: other.kind_name(),
                }),
            },
            FieldType::Array(a) => a.validate(v),
            FieldType::Text(t) => t.validate(v),
            FieldType::Struct(proto) => match v {
                Value::Struct(r) if Arc::ptr_eq(r.shape_arc(), proto.shape_arc()) => Ok(()),
                Value::Struct(r) => Err(Error::ShapeMismatch {
                    expected: proto.shape().name().to_string(),
                    got: r.shape().name().to_string(),
                }),
                other => Err(Error::Shape {
                    expected: "struct",
                    got: other.kind_name(),
                }),
            },
        }
    }

    /// Validates and canonicalizes a value for storage. Scalar coercion
    /// (integer into float kinds) is applied recursively through arrays.
    pub(crate) fn normalize(&self, v: Value) -> Result<Value> {
        match self {
            FieldType::Scalar(s) => match v {
                Value::Scalar(sv) => Ok(Value::Scalar(s.normalize(sv)?)),
                other => {
                    self.validate(&other)?;
                    Ok(other)
                }
            },
            FieldType::Array(a) => match v {
                Value::Array(elems) => {
                    if elems.len() != a.len() {
                        return Err(Error::Length {
                            expected: a.len(),
                            got: elems.len(),
                        });
                    }
                    let elems = elems
                        .into_iter()
                        .map(|e| a.elem().normalize(e))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(Value::Array(elems))
                }
                other => {
                    self.validate(&other)?;
                    Ok(other)
                }
            },
            FieldType::Text(_) | FieldType::Struct(_) => {
                self.validate(&v)?;
                Ok(v)
            }
        }
    }

    pub fn default_value(&self) -> Value {
        match self {
            FieldType::Scalar(s) => Value::Scalar(s.default_value()),
            FieldType::Array(a) => a.default_value(),
            FieldType::Text(t) => t.default_value(),
            FieldType::Struct(proto) => Value::Struct(proto.clone()),
        }
    }

    /// Appends this type's layout contribution: one token per leaf scalar,
    /// recursively expanded in declaration order.
    pub(crate) fn layout_into(&self, tokens: &mut Vec<ScalarKind>) {
        match self {
            FieldType::Scalar(s) => tokens.push(s.kind()),
            FieldType::Array(a) => {
                for _ in 0..a.len() {
                    a.elem().layout_into(tokens);
                }
            }
            FieldType::Text(t) => {
                tokens.extend(std::iter::repeat(ScalarKind::UInt8).take(t.len()));
            }
            // A struct field contributes the nested shape's full descriptor.
            FieldType::Struct(proto) => {
                tokens.extend_from_slice(proto.shape().layout().tokens());
            }
        }
    }

    /// The element type and fixed length of a sequence field, if this is one.
    pub(crate) fn sequence(&self) -> Option<(FieldType, usize)> {
        match self {
            FieldType::Array(a) => Some((a.elem().clone(), a.len())),
            FieldType::Text(t) => Some((FieldType::Scalar(t.elem_type()), t.len())),
            _ => None,
        }
    }
}

/// A name bound to a type, owned by a shape.
#[derive(Debug, Clone)]
pub struct FieldDef {
    name: String,
    ty: FieldType,
}

impl FieldDef {
    pub(crate) fn new(name: String, ty: FieldType) -> Self {
        Self { name, ty }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }
}

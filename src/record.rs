//! # Record Instances
//!
//! A [`Record`] is one value of a shape: an `Arc` to its schema plus one
//! [`Value`] per declared field, kept individually valid at all times.
//! Validation runs synchronously on every assignment path, never lazily; a
//! rejected assignment leaves the record exactly as it was.
//!
//! ## Mutation Surface
//!
//! | Operation | Checks |
//! |-----------|--------|
//! | `set(name, v)` | `UnknownField`, then the field type's own validation |
//! | `set_elem(name, i, v)` | sequence field, index bounds, element validation |
//! | `set_slice(name, r, vs)` | bounds, replacement length == addressed length |
//! | `set_bytes` / `set_text` | byte input zero-padded to the fixed length |
//!
//! Assigning a whole record into a struct field requires the exact same
//! shape and stores an owned deep copy; the stored value never aliases the
//! source instance.
//!
//! ## Thread Safety
//!
//! Shapes are immutable and freely shared. Records are plain mutable value
//! objects meant to be owned by a single caller at a time; concurrent
//! mutation of one instance needs external synchronization this crate does
//! not provide.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::codec;
use crate::error::{Error, Result};
use crate::field::FieldType;
use crate::flatten;
use crate::scalar::ScalarValue;
use crate::shape::Shape;
use crate::text::value_bytes;

/// One field value: a primitive scalar, a fixed sequence, or a nested record.
#[derive(Clone, PartialEq)]
pub enum Value {
    Scalar(ScalarValue),
    Array(Vec<Value>),
    Struct(Record),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Scalar(s) => s.kind_name(),
            Value::Array(_) => "array",
            Value::Struct(_) => "struct",
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            Value::Scalar(s) => s.as_int(),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Scalar(s) => s.as_float(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(elems) => Some(elems),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Record> {
        match self {
            Value::Struct(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => write!(f, "{s}"),
            Value::Array(elems) => f.debug_list().entries(elems).finish(),
            Value::Struct(r) => r.fmt(f),
        }
    }
}

macro_rules! value_from_int {
    ($($native:ty),*) => {
        $(
            impl From<$native> for Value {
                fn from(v: $native) -> Self {
                    Value::Scalar(ScalarValue::Int(v as i128))
                }
            }
        )*
    };
}

value_from_int!(i8, u8, i16, u16, i32, u32, i64, u64, i128);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Scalar(ScalarValue::Float(v as f64))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(ScalarValue::Float(v))
    }
}

impl From<ScalarValue> for Value {
    fn from(v: ScalarValue) -> Self {
        Value::Scalar(v)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Struct(r)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elems: Vec<Value>) -> Self {
        Value::Array(elems)
    }
}

/// One instance of a shape, every field valid at all times.
#[derive(Clone)]
pub struct Record {
    shape: Arc<Shape>,
    values: Vec<Value>,
}

impl Record {
    pub(crate) fn from_defaults(shape: Arc<Shape>) -> Self {
        let values = shape
            .fields()
            .iter()
            .map(|f| f.ty().default_value())
            .collect();
        Self { shape, values }
    }

    pub(crate) fn from_values(shape: Arc<Shape>, values: Vec<Value>) -> Self {
        Self { shape, values }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub(crate) fn shape_arc(&self) -> &Arc<Shape> {
        &self.shape
    }

    pub(crate) fn values(&self) -> &[Value] {
        &self.values
    }

    /// Field values paired with their names, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.shape
            .fields()
            .iter()
            .map(|f| f.name())
            .zip(self.values.iter())
    }

    fn field_index(&self, name: &str) -> Result<usize> {
        self.shape
            .field_index(name)
            .ok_or_else(|| Error::UnknownField {
                shape: self.shape.name().to_string(),
                field: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        let idx = self.field_index(name)?;
        Ok(&self.values[idx])
    }

    /// Validated field assignment. The value is checked in full against the
    /// field's type before anything is stored.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let idx = self.field_index(name)?;
        let value = self.shape.fields()[idx].ty().normalize(value.into())?;
        self.values[idx] = value;
        Ok(())
    }

    /// Replaces one element of a fixed array or text field. Index bounds and
    /// the element type are checked before mutation.
    pub fn set_elem(&mut self, name: &str, elem_idx: usize, value: impl Into<Value>) -> Result<()> {
        let idx = self.field_index(name)?;
        let (elem_ty, len) =
            self.shape.fields()[idx]
                .ty()
                .sequence()
                .ok_or(Error::Shape {
                    expected: "array",
                    got: "scalar",
                })?;
        if elem_idx >= len {
            return Err(Error::Length {
                expected: len,
                got: elem_idx,
            });
        }
        let value = elem_ty.normalize(value.into())?;
        if let Value::Array(elems) = &mut self.values[idx] {
            elems[elem_idx] = value;
        }
        Ok(())
    }

    /// Replaces `range` of a fixed array or text field with `values`. The
    /// replacement length must equal the addressed length; the array length
    /// never changes.
    pub fn set_slice(&mut self, name: &str, range: Range<usize>, values: &[Value]) -> Result<()> {
        let idx = self.field_index(name)?;
        let (elem_ty, len) =
            self.shape.fields()[idx]
                .ty()
                .sequence()
                .ok_or(Error::Shape {
                    expected: "array",
                    got: "scalar",
                })?;
        if range.start > range.end || range.end > len {
            return Err(Error::Length {
                expected: len,
                got: range.end,
            });
        }
        if values.len() != range.len() {
            return Err(Error::Length {
                expected: range.len(),
                got: values.len(),
            });
        }
        let values = values
            .iter()
            .map(|v| elem_ty.normalize(v.clone()))
            .collect::<Result<Vec<_>>>()?;
        if let Value::Array(elems) = &mut self.values[idx] {
            elems[range].clone_from_slice(&values);
        }
        Ok(())
    }

    /// Assigns raw bytes to a text field or a byte array field, zero-padded
    /// to the declared length.
    pub fn set_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let idx = self.field_index(name)?;
        let value = match self.shape.fields()[idx].ty() {
            FieldType::Text(t) => t.value_from_bytes(bytes)?,
            FieldType::Array(a) => a.value_from_bytes(bytes)?,
            _ => {
                return Err(Error::Shape {
                    expected: "array",
                    got: self.values[idx].kind_name(),
                })
            }
        };
        self.values[idx] = value;
        Ok(())
    }

    pub fn set_text(&mut self, name: &str, text: &str) -> Result<()> {
        self.set_bytes(name, text.as_bytes())
    }

    /// Decodes a text field: trailing zero bytes stripped, UTF-8 decoded.
    pub fn get_text(&self, name: &str) -> Result<String> {
        let idx = self.field_index(name)?;
        match self.shape.fields()[idx].ty() {
            FieldType::Text(t) => t.decode_value(&self.values[idx]),
            _ => Err(Error::Shape {
                expected: "text",
                got: self.values[idx].kind_name(),
            }),
        }
    }

    /// Byte-wise equality of a text or byte array field against `other`,
    /// zero-padded or truncated to the field's declared length.
    pub fn bytes_eq(&self, name: &str, other: &[u8]) -> Result<bool> {
        let idx = self.field_index(name)?;
        let padded = match self.shape.fields()[idx].ty() {
            FieldType::Text(t) => t.padded(other),
            FieldType::Array(a) if a.is_byte_array() => {
                let mut p = other.to_vec();
                p.resize(a.len(), 0);
                p
            }
            _ => {
                return Err(Error::Shape {
                    expected: "array",
                    got: self.values[idx].kind_name(),
                })
            }
        };
        Ok(value_bytes(&self.values[idx]) == padded)
    }

    pub fn text_eq(&self, name: &str, other: &str) -> Result<bool> {
        self.bytes_eq(name, other.as_bytes())
    }

    pub fn get_int(&self, name: &str) -> Result<i128> {
        let value = self.get(name)?;
        value.as_int().ok_or(Error::Shape {
            expected: "integer",
            got: value.kind_name(),
        })
    }

    pub fn get_float(&self, name: &str) -> Result<f64> {
        let value = self.get(name)?;
        value.as_float().ok_or(Error::Shape {
            expected: "float",
            got: value.kind_name(),
        })
    }

    /// Flat ordered primitive sequence, in lock-step with the shape's layout
    /// token order.
    pub fn flatten(&self) -> Vec<ScalarValue> {
        flatten::flatten(self).to_vec()
    }

    /// Encodes to the shape's fixed-length little-endian wire form.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let flat = flatten::flatten(self);
        codec::pack(self.shape.layout(), &flat)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shape, &other.shape) && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.shape.name());
        for (name, value) in self.iter() {
            s.field(name, value);
        }
        s.finish()
    }
}

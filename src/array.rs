//! Fixed-length homogeneous arrays.
//!
//! An [`ArrayType`] pairs a single element type with a length `N` that is
//! fixed for the life of the shape. Any assigned sequence must have exactly
//! `N` elements and every element must pass the element type's own
//! validation. There is no insert, delete or append; only element and slice
//! replacement through the owning record.
//!
//! As a byte-buffer convenience, arrays of `UInt8` scalars also accept raw
//! byte input shorter than `N`, zero-padded to length.

use crate::error::{Error, Result};
use crate::field::FieldType;
use crate::record::Value;
use crate::scalar::{ScalarKind, ScalarValue};

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    elem: Box<FieldType>,
    len: usize,
}

impl ArrayType {
    pub fn new(elem: FieldType, len: usize) -> Self {
        Self {
            elem: Box::new(elem),
            len,
        }
    }

    pub fn elem(&self) -> &FieldType {
        &self.elem
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Shape check, exact-length check, then per-element delegation. The
    /// first element failure aborts the whole validation.
    pub fn validate(&self, v: &Value) -> Result<()> {
        let elems = match v {
            Value::Array(elems) => elems,
            other => {
                return Err(Error::Shape {
                    expected: "array",
                    got: other.kind_name(),
                })
            }
        };
        if elems.len() != self.len {
            return Err(Error::Length {
                expected: self.len,
                got: elems.len(),
            });
        }
        for elem in elems {
            self.elem.validate(elem)?;
        }
        Ok(())
    }

    /// N fresh element defaults.
    pub fn default_value(&self) -> Value {
        Value::Array((0..self.len).map(|_| self.elem.default_value()).collect())
    }

    /// True when the element type is the single-byte unsigned scalar, the
    /// only case where raw byte input is accepted.
    pub(crate) fn is_byte_array(&self) -> bool {
        matches!(
            self.elem.as_ref(),
            FieldType::Scalar(s) if s.kind() == ScalarKind::UInt8
        )
    }

    /// Builds an array value from raw bytes, zero-padded to `N`. Input longer
    /// than `N` is a length error; non-byte element types reject raw bytes.
    pub(crate) fn value_from_bytes(&self, bytes: &[u8]) -> Result<Value> {
        if !self.is_byte_array() {
            return Err(Error::Shape {
                expected: "array",
                got: "bytes",
            });
        }
        if bytes.len() > self.len {
            return Err(Error::Length {
                expected: self.len,
                got: bytes.len(),
            });
        }
        let mut elems: Vec<Value> = bytes
            .iter()
            .map(|b| Value::Scalar(ScalarValue::Int(*b as i128)))
            .collect();
        elems.resize(self.len, Value::Scalar(ScalarValue::Int(0)));
        Ok(Value::Array(elems))
    }
}

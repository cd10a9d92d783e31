//! Fixed-length null-padded text fields.
//!
//! A [`TextType`] is a fixed array of `UInt8` scalars interpreted as text:
//! shorter input is zero-padded to `N`, decode strips all trailing zero bytes
//! before UTF-8 decoding, and equality compares against the comparison value
//! zero-padded or truncated to `N`. Two text fields are equal iff their
//! padded byte forms match, independent of which trailing zeros are padding
//! and which are content.

use crate::error::{Error, Result};
use crate::record::Value;
use crate::scalar::{ScalarKind, ScalarType, ScalarValue};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextType {
    len: usize,
}

impl TextType {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn elem_type(&self) -> ScalarType {
        ScalarType::new(ScalarKind::UInt8)
    }

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
        let elem_ty = self.elem_type();
        for elem in elems {
            match elem {
                Value::Scalar(s) => elem_ty.validate(s)?,
                other => {
                    return Err(Error::Shape {
                        expected: "integer",
                        got: other.kind_name(),
                    })
                }
            }
        }
        Ok(())
    }

    /// All-zero bytes, the empty string.
    pub fn default_value(&self) -> Value {
        Value::Array(vec![Value::Scalar(ScalarValue::Int(0)); self.len])
    }

    pub(crate) fn value_from_bytes(&self, bytes: &[u8]) -> Result<Value> {
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

    /// Current bytes with all trailing zeros stripped, UTF-8 decoded.
    pub(crate) fn decode_value(&self, v: &Value) -> Result<String> {
        let bytes = value_bytes(v);
        let trimmed_len = bytes
            .iter()
            .rposition(|b| *b != 0)
            .map(|p| p + 1)
            .unwrap_or(0);
        String::from_utf8(bytes[..trimmed_len].to_vec()).map_err(|e| Error::Decode {
            reason: e.to_string(),
        })
    }

    /// Comparison value padded or truncated to `N`.
    pub(crate) fn padded(&self, bytes: &[u8]) -> Vec<u8> {
        let mut out = bytes.to_vec();
        out.resize(self.len, 0);
        out
    }
}

/// Byte image of a validated byte-array value.
pub(crate) fn value_bytes(v: &Value) -> Vec<u8> {
    match v {
        Value::Array(elems) => elems
            .iter()
            .map(|e| match e {
                Value::Scalar(ScalarValue::Int(i)) => *i as u8,
                _ => 0,
            })
            .collect(),
        _ => Vec::new(),
    }
}

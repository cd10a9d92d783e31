//! # Scalar Types
//!
//! The leaf level of the type system: one [`ScalarKind`] per concrete numeric
//! encoding, a [`ScalarValue`] that can hold any of them, and [`ScalarType`]
//! binding a kind to a declared default.
//!
//! ## Kinds and Widths
//!
//! | Kind | Width | Legal range |
//! |------|-------|-------------|
//! | Int8 / UInt8 | 1 | -0x80..=0x7F / 0..=0xFF |
//! | Int16 / UInt16 | 2 | -0x8000..=0x7FFF / 0..=0xFFFF |
//! | Int32 / UInt32 | 4 | 32-bit signed / unsigned |
//! | Int64 / UInt64 | 8 | 64-bit signed / unsigned |
//! | Float32 | 4 | finite f32 range, plus ±inf and NaN |
//! | Float64 | 8 | finite f64 range, plus ±inf and NaN |
//!
//! Integer values are carried as `i128` so one representation covers both
//! `i64::MIN` and `u64::MAX`. Float kinds accept integer input and coerce it;
//! integer kinds reject float input outright.

use std::fmt;

use crate::error::{Error, Result};

/// Concrete numeric encoding, one discriminant per wire representation.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int8 = 0,
    UInt8 = 1,
    Int16 = 2,
    UInt16 = 3,
    Int32 = 4,
    UInt32 = 5,
    Int64 = 6,
    UInt64 = 7,
    Float32 = 8,
    Float64 = 9,
}

impl ScalarKind {
    /// Encoded width in bytes.
    pub fn byte_width(&self) -> usize {
        match self {
            ScalarKind::Int8 | ScalarKind::UInt8 => 1,
            ScalarKind::Int16 | ScalarKind::UInt16 => 2,
            ScalarKind::Int32 | ScalarKind::UInt32 | ScalarKind::Float32 => 4,
            ScalarKind::Int64 | ScalarKind::UInt64 | ScalarKind::Float64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ScalarKind::Float32 | ScalarKind::Float64)
    }

    /// Inclusive integer limits. Float kinds have none.
    pub(crate) fn int_bounds(&self) -> Option<(i128, i128)> {
        match self {
            ScalarKind::Int8 => Some((i8::MIN as i128, i8::MAX as i128)),
            ScalarKind::UInt8 => Some((0, u8::MAX as i128)),
            ScalarKind::Int16 => Some((i16::MIN as i128, i16::MAX as i128)),
            ScalarKind::UInt16 => Some((0, u16::MAX as i128)),
            ScalarKind::Int32 => Some((i32::MIN as i128, i32::MAX as i128)),
            ScalarKind::UInt32 => Some((0, u32::MAX as i128)),
            ScalarKind::Int64 => Some((i64::MIN as i128, i64::MAX as i128)),
            ScalarKind::UInt64 => Some((0, u64::MAX as i128)),
            ScalarKind::Float32 | ScalarKind::Float64 => None,
        }
    }

    /// Finite float limits for float kinds.
    pub(crate) fn float_bounds(&self) -> Option<(f64, f64)> {
        match self {
            ScalarKind::Float32 => Some((-f32::MAX as f64, f32::MAX as f64)),
            ScalarKind::Float64 => Some((f64::MIN, f64::MAX)),
            _ => None,
        }
    }
}

/// One primitive value, the unit the flatten engine and the codec trade in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    Int(i128),
    Float(f64),
}

impl ScalarValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ScalarValue::Int(_) => "integer",
            ScalarValue::Float(_) => "float",
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            ScalarValue::Int(i) => Some(*i),
            ScalarValue::Float(_) => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ScalarValue::Float(f) => Some(*f),
            ScalarValue::Int(_) => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Int(i) => write!(f, "{i}"),
            ScalarValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A scalar field type: a kind plus its declared default.
///
/// The default always satisfies `lower <= default <= upper`; the checked
/// constructor enforces it, and the typed `FieldType` constructors are in
/// range by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarType {
    kind: ScalarKind,
    default: ScalarValue,
}

impl ScalarType {
    /// Scalar type with the kind's zero default.
    pub fn new(kind: ScalarKind) -> Self {
        let default = if kind.is_float() {
            ScalarValue::Float(0.0)
        } else {
            ScalarValue::Int(0)
        };
        Self { kind, default }
    }

    /// Scalar type with a configured default, validated against the kind.
    pub fn with_default(kind: ScalarKind, default: ScalarValue) -> Result<Self> {
        let ty = Self::new(kind);
        let default = ty.normalize(default)?;
        Ok(Self { kind, default })
    }

    /// Internal constructor for defaults already known to be in range.
    pub(crate) fn raw(kind: ScalarKind, default: ScalarValue) -> Self {
        Self { kind, default }
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn default_value(&self) -> ScalarValue {
        self.default
    }

    /// Checks numeric kind and range. Float kinds accept integer input and
    /// treat ±inf and NaN as always valid.
    pub fn validate(&self, v: &ScalarValue) -> Result<()> {
        match (self.kind.is_float(), v) {
            (false, ScalarValue::Float(_)) => Err(Error::Kind {
                kind: self.kind,
                expected: "integer",
                got: "float",
            }),
            (false, ScalarValue::Int(i)) => {
                let (lower, upper) = self.kind.int_bounds().unwrap_or((i128::MIN, i128::MAX));
                if *i < lower || *i > upper {
                    return Err(Error::Range {
                        kind: self.kind,
                        value: i.to_string(),
                    });
                }
                Ok(())
            }
            // Any i128 fits the finite f32 range, so integers always pass.
            (true, ScalarValue::Int(_)) => Ok(()),
            (true, ScalarValue::Float(f)) => {
                if f.is_nan() || f.is_infinite() {
                    return Ok(());
                }
                let (lower, upper) = self.kind.float_bounds().unwrap_or((f64::MIN, f64::MAX));
                if *f < lower || *f > upper {
                    return Err(Error::Range {
                        kind: self.kind,
                        value: f.to_string(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Validates and canonicalizes: integers assigned to float kinds are
    /// stored as floats so the stored form matches the wire form.
    pub(crate) fn normalize(&self, v: ScalarValue) -> Result<ScalarValue> {
        self.validate(&v)?;
        match (self.kind.is_float(), v) {
            (true, ScalarValue::Int(i)) => Ok(ScalarValue::Float(i as f64)),
            _ => Ok(v),
        }
    }
}

//! # Error Taxonomy
//!
//! Every failure in the crate is one variant of the closed [`Error`] enum, so
//! callers can match on the exact failure class instead of parsing messages.
//!
//! | Variant | Raised by |
//! |---------|-----------|
//! | `Kind` | scalar validation, integer vs float mismatch |
//! | `Range` | scalar validation, value outside the type's limits |
//! | `Shape` | sequence/struct expected but another value class given |
//! | `Length` | array length or index mismatch |
//! | `UnknownField` | construction or assignment with an undeclared name |
//! | `DuplicateField` | shape build with a repeated field name |
//! | `ShapeMismatch` | struct field assigned a record of another shape |
//! | `SizeMismatch` | shape build when the declared size disagrees |
//! | `Underflow` | decode or unflatten ran out of input |
//! | `Decode` | text field holds invalid UTF-8 |
//!
//! All failures are synchronous and leave the target record untouched: an
//! assignment either fully succeeds or is rejected before any mutation. Shape
//! build failures (`DuplicateField`, `SizeMismatch`) produce no shape at all.

use thiserror::Error;

use crate::scalar::ScalarKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Scalar value of the wrong numeric kind (integer vs float).
    #[error("{kind:?} expects {expected} value, got {got}")]
    Kind {
        kind: ScalarKind,
        expected: &'static str,
        got: &'static str,
    },

    /// Scalar value outside the type's inclusive limits.
    #[error("{kind:?} value {value} is out of range")]
    Range { kind: ScalarKind, value: String },

    /// A sequence or struct was expected but another value class was given.
    #[error("expected {expected} value, got {got}")]
    Shape {
        expected: &'static str,
        got: &'static str,
    },

    /// Array bounds or length mismatch.
    #[error("array bounds or length mismatch (got {got}, expected {expected})")]
    Length { expected: usize, got: usize },

    /// Field name not declared on the shape.
    #[error("field '{field}' is not a member of shape '{shape}'")]
    UnknownField { shape: String, field: String },

    /// Two fields on one shape share a name.
    #[error("duplicate field '{field}' in shape '{shape}'")]
    DuplicateField { shape: String, field: String },

    /// A struct field was assigned a record of a different shape.
    #[error("cannot assign record of shape '{got}' where shape '{expected}' is required")]
    ShapeMismatch { expected: String, got: String },

    /// The declared encoded size disagrees with the computed one.
    #[error("shape '{shape}' encodes to {computed} bytes, declared {declared}")]
    SizeMismatch {
        shape: String,
        computed: usize,
        declared: usize,
    },

    /// Decode or unflatten exhausted its input early.
    #[error("input exhausted (needed {needed}, had {available})")]
    Underflow { needed: usize, available: usize },

    /// Text field bytes are not valid UTF-8.
    #[error("text decode failed: {reason}")]
    Decode { reason: String },
}

//! # Shape Definition and Layout Derivation
//!
//! A [`Shape`] is the schema of a record: an ordered, named set of field
//! descriptors plus the layout metadata derived from them. Shapes are built
//! once through [`ShapeBuilder`], wrapped in `Arc`, and never mutated again;
//! any number of threads may share a built shape without synchronization.
//!
//! ## Layout Descriptor
//!
//! At build time the shape's fields are expanded, in declaration order, into
//! a flat token sequence with one [`ScalarKind`] per leaf scalar:
//!
//! - a scalar field contributes one token of its own kind
//! - an array field contributes `N` repetitions of its element contribution
//! - a text field contributes `N` `UInt8` tokens
//! - a struct field contributes the nested shape's full descriptor
//!
//! The token order is exactly the order the flatten engine emits primitive
//! values in, which is what makes encode and decode agree. The encoded byte
//! length is the sum of the token widths: little-endian, no padding between
//! fields.
//!
//! ## Build-Time Checks
//!
//! Duplicate field names fail the build with `DuplicateField`. A shape may
//! declare an expected encoded size; if the computed length disagrees the
//! build fails with `SizeMismatch`. Both are definition-time failures, never
//! per-instance ones, and a failed build yields no shape at all.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::codec;
use crate::error::{Error, Result};
use crate::field::{FieldDef, FieldType};
use crate::flatten;
use crate::record::{Record, Value};
use crate::scalar::{ScalarKind, ScalarValue};

/// Ordered token sequence plus total encoded length, derived once per shape.
#[derive(Debug, Clone)]
pub struct Layout {
    tokens: Vec<ScalarKind>,
    byte_len: usize,
}

impl Layout {
    pub(crate) fn from_fields(fields: &[FieldDef]) -> Self {
        let mut tokens = Vec::new();
        for field in fields {
            field.ty().layout_into(&mut tokens);
        }
        let byte_len = tokens.iter().map(|t| t.byte_width()).sum();
        Self { tokens, byte_len }
    }

    /// One token per leaf scalar, in flatten order.
    pub fn tokens(&self) -> &[ScalarKind] {
        &self.tokens
    }

    /// Total encoded length in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }
}

/// Immutable record schema: ordered fields, name index, derived layout.
#[derive(Debug)]
pub struct Shape {
    name: String,
    fields: Vec<FieldDef>,
    index: HashMap<String, usize>,
    layout: Layout,
}

/// Collects `(name, type)` pairs in declaration order and produces an
/// immutable [`Shape`].
///
/// ```ignore
/// let range = ShapeBuilder::new("Range")
///     .field("begin", FieldType::uint64())
///     .field("end", FieldType::uint64())
///     .expected_size(16)
///     .build()?;
/// ```
pub struct ShapeBuilder {
    name: String,
    fields: Vec<FieldDef>,
    expected_size: Option<usize>,
}

impl ShapeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            expected_size: None,
        }
    }

    /// Declares the next field. Declaration order is encoding order.
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDef::new(name.into(), ty));
        self
    }

    /// Declares the encoded size this shape must come out to. A static
    /// definition-time assertion, not a per-instance check.
    pub fn expected_size(mut self, bytes: usize) -> Self {
        self.expected_size = Some(bytes);
        self
    }

    pub fn build(self) -> Result<Arc<Shape>> {
        let mut index = HashMap::with_capacity(self.fields.len());
        for (idx, field) in self.fields.iter().enumerate() {
            if index.insert(field.name().to_string(), idx).is_some() {
                return Err(Error::DuplicateField {
                    shape: self.name,
                    field: field.name().to_string(),
                });
            }
        }

        let layout = Layout::from_fields(&self.fields);
        if let Some(declared) = self.expected_size {
            if layout.byte_len() != declared {
                return Err(Error::SizeMismatch {
                    shape: self.name,
                    computed: layout.byte_len(),
                    declared,
                });
            }
        }

        Ok(Arc::new(Shape {
            name: self.name,
            fields: self.fields,
            index,
            layout,
        }))
    }
}

impl Shape {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.index.get(name).map(|idx| &self.fields[*idx])
    }

    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Encoded length in bytes of every instance of this shape.
    pub fn encoded_len(&self) -> usize {
        self.layout.byte_len()
    }

    /// New instance with every field at its declared default.
    pub fn instantiate(self: &Arc<Self>) -> Record {
        Record::from_defaults(self.clone())
    }

    /// New instance with named overrides applied over the defaults. Each
    /// override is validated against its field's type; a name not declared
    /// on the shape fails with `UnknownField`.
    pub fn instantiate_with<'a>(
        self: &Arc<Self>,
        overrides: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Result<Record> {
        let mut record = self.instantiate();
        for (name, value) in overrides {
            record.set(name, value)?;
        }
        Ok(record)
    }

    /// Decodes a buffer of exactly `encoded_len` bytes into a new instance.
    pub fn decode(self: &Arc<Self>, data: &[u8]) -> Result<Record> {
        if data.len() > self.encoded_len() {
            return Err(Error::Length {
                expected: self.encoded_len(),
                got: data.len(),
            });
        }
        self.decode_at(data, 0)
    }

    /// Decodes `encoded_len` bytes starting at `offset`; trailing bytes
    /// beyond the record are permitted.
    pub fn decode_at(self: &Arc<Self>, data: &[u8], offset: usize) -> Result<Record> {
        let values = codec::unpack(&self.layout, data, offset)?;
        flatten::unflatten(self, &values)
    }

    /// Reconstructs an instance from a flat primitive sequence in layout
    /// token order, validating every value as it is assigned.
    pub fn unflatten(self: &Arc<Self>, values: &[ScalarValue]) -> Result<Record> {
        flatten::unflatten(self, values)
    }
}

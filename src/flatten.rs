//! Flatten/unflatten engine.
//!
//! Flatten walks a record's field tree depth-first in declaration order and
//! emits one primitive scalar per leaf; unflatten consumes the same sequence
//! back into a fresh instance. The emitted order and length stay in
//! lock-step with the shape's layout token order, which is the invariant
//! encode and decode rest on.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::field::FieldType;
use crate::record::{Record, Value};
use crate::scalar::ScalarValue;
use crate::shape::Shape;

pub(crate) type FlatBuf = SmallVec<[ScalarValue; 32]>;

pub(crate) fn flatten(record: &Record) -> FlatBuf {
    let mut out = FlatBuf::new();
    flatten_record(record, &mut out);
    out
}

fn flatten_record(record: &Record, out: &mut FlatBuf) {
    for value in record.values() {
        flatten_value(value, out);
    }
}

fn flatten_value(value: &Value, out: &mut FlatBuf) {
    match value {
        Value::Scalar(s) => out.push(*s),
        Value::Array(elems) => {
            for elem in elems {
                flatten_value(elem, out);
            }
        }
        Value::Struct(r) => flatten_record(r, out),
    }
}

struct Cursor<'a> {
    values: &'a [ScalarValue],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn next(&mut self) -> Result<ScalarValue> {
        let value = self.values.get(self.pos).copied().ok_or(Error::Underflow {
            needed: self.pos + 1,
            available: self.values.len(),
        })?;
        self.pos += 1;
        Ok(value)
    }
}

/// Rebuilds an instance from a flat primitive sequence, consuming exactly as
/// many leading values per field as that field contributed layout tokens.
/// Every value passes its type's validation as it is assigned.
pub(crate) fn unflatten(shape: &Arc<Shape>, values: &[ScalarValue]) -> Result<Record> {
    let mut cursor = Cursor { values, pos: 0 };
    unflatten_record(shape, &mut cursor)
}

fn unflatten_record(shape: &Arc<Shape>, cursor: &mut Cursor<'_>) -> Result<Record> {
    let mut values = Vec::with_capacity(shape.fields().len());
    for field in shape.fields() {
        values.push(unflatten_value(field.ty(), cursor)?);
    }
    Ok(Record::from_values(shape.clone(), values))
}

fn unflatten_value(ty: &FieldType, cursor: &mut Cursor<'_>) -> Result<Value> {
    match ty {
        FieldType::Scalar(s) => {
            let value = cursor.next()?;
            Ok(Value::Scalar(s.normalize(value)?))
        }
        FieldType::Array(a) => {
            let mut elems = Vec::with_capacity(a.len());
            for _ in 0..a.len() {
                elems.push(unflatten_value(a.elem(), cursor)?);
            }
            Ok(Value::Array(elems))
        }
        FieldType::Text(t) => {
            let elem_ty = t.elem_type();
            let mut elems = Vec::with_capacity(t.len());
            for _ in 0..t.len() {
                let value = cursor.next()?;
                elem_ty.validate(&value)?;
                elems.push(Value::Scalar(value));
            }
            Ok(Value::Array(elems))
        }
        FieldType::Struct(proto) => {
            let record = unflatten_record(proto.shape_arc(), cursor)?;
            Ok(Value::Struct(record))
        }
    }
}

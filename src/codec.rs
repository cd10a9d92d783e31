//! # Byte Packing
//!
//! The byte-level collaborator: turns a flat primitive sequence into a
//! fixed-length buffer and back, driven entirely by a shape's layout tokens.
//!
//! ## Packing Policy
//!
//! Every scalar is encoded **little-endian** with **no padding** between
//! fields, regardless of host architecture. The buffer length is always the
//! layout's computed byte length; its content is fully determined by the
//! flatten order and this policy, which makes the encoded form the de facto
//! wire and file format.
//!
//! ```text
//! Range { begin: u64 = 1, end: u64 = 2 }
//!
//! 01 00 00 00 00 00 00 00  02 00 00 00 00 00 00 00
//! ^--- begin, 8 bytes LE   ^--- end, 8 bytes LE
//! ```

use crate::error::{Error, Result};
use crate::scalar::{ScalarKind, ScalarValue};
use crate::shape::Layout;

/// Packs one primitive value per layout token into a fresh buffer of exactly
/// `layout.byte_len()` bytes.
pub fn pack(layout: &Layout, values: &[ScalarValue]) -> Result<Vec<u8>> {
    if values.len() != layout.tokens().len() {
        return Err(Error::Length {
            expected: layout.tokens().len(),
            got: values.len(),
        });
    }
    let mut buf = Vec::with_capacity(layout.byte_len());
    for (token, value) in layout.tokens().iter().zip(values) {
        pack_one(*token, value, &mut buf)?;
    }
    Ok(buf)
}

/// Unpacks `layout.byte_len()` bytes starting at `offset` into one primitive
/// value per layout token.
pub fn unpack(layout: &Layout, data: &[u8], offset: usize) -> Result<Vec<ScalarValue>> {
    let needed = offset + layout.byte_len();
    if data.len() < needed {
        return Err(Error::Underflow {
            needed,
            available: data.len(),
        });
    }
    let mut values = Vec::with_capacity(layout.tokens().len());
    let mut pos = offset;
    for token in layout.tokens() {
        let width = token.byte_width();
        values.push(unpack_one(*token, &data[pos..pos + width]));
        pos += width;
    }
    Ok(values)
}

fn int_of(kind: ScalarKind, value: &ScalarValue) -> Result<i128> {
    value.as_int().ok_or(Error::Kind {
        kind,
        expected: "integer",
        got: value.kind_name(),
    })
}

fn float_of(value: &ScalarValue) -> f64 {
    match value {
        ScalarValue::Float(f) => *f,
        ScalarValue::Int(i) => *i as f64,
    }
}

fn pack_one(kind: ScalarKind, value: &ScalarValue, buf: &mut Vec<u8>) -> Result<()> {
    match kind {
        ScalarKind::Int8 => buf.extend_from_slice(&(int_of(kind, value)? as i8).to_le_bytes()),
        ScalarKind::UInt8 => buf.extend_from_slice(&(int_of(kind, value)? as u8).to_le_bytes()),
        ScalarKind::Int16 => buf.extend_from_slice(&(int_of(kind, value)? as i16).to_le_bytes()),
        ScalarKind::UInt16 => buf.extend_from_slice(&(int_of(kind, value)? as u16).to_le_bytes()),
        ScalarKind::Int32 => buf.extend_from_slice(&(int_of(kind, value)? as i32).to_le_bytes()),
        ScalarKind::UInt32 => buf.extend_from_slice(&(int_of(kind, value)? as u32).to_le_bytes()),
        ScalarKind::Int64 => buf.extend_from_slice(&(int_of(kind, value)? as i64).to_le_bytes()),
        ScalarKind::UInt64 => buf.extend_from_slice(&(int_of(kind, value)? as u64).to_le_bytes()),
        ScalarKind::Float32 => buf.extend_from_slice(&(float_of(value) as f32).to_le_bytes()),
        ScalarKind::Float64 => buf.extend_from_slice(&float_of(value).to_le_bytes()),
    }
    Ok(())
}

fn arr<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

fn unpack_one(kind: ScalarKind, bytes: &[u8]) -> ScalarValue {
    match kind {
        ScalarKind::Int8 => ScalarValue::Int(i8::from_le_bytes(arr(bytes)) as i128),
        ScalarKind::UInt8 => ScalarValue::Int(bytes[0] as i128),
        ScalarKind::Int16 => ScalarValue::Int(i16::from_le_bytes(arr(bytes)) as i128),
        ScalarKind::UInt16 => ScalarValue::Int(u16::from_le_bytes(arr(bytes)) as i128),
        ScalarKind::Int32 => ScalarValue::Int(i32::from_le_bytes(arr(bytes)) as i128),
        ScalarKind::UInt32 => ScalarValue::Int(u32::from_le_bytes(arr(bytes)) as i128),
        ScalarKind::Int64 => ScalarValue::Int(i64::from_le_bytes(arr(bytes)) as i128),
        ScalarKind::UInt64 => ScalarValue::Int(u64::from_le_bytes(arr(bytes)) as i128),
        ScalarKind::Float32 => ScalarValue::Float(f32::from_le_bytes(arr(bytes)) as f64),
        ScalarKind::Float64 => ScalarValue::Float(f64::from_le_bytes(arr(bytes))),
    }
}

//! Conversion between logical [`Value`]s and the little-endian wire bytes of
//! a register's [`DataType`].

use crate::data_type::DataType;
use crate::error::{Result, ServoError};
use crate::value::Value;

/// Encode `value` into the exact wire width of `data_type`.
///
/// A float given for an integer type is truncated toward zero (7.9 is sent
/// as 7, -7.9 as -7). Drives have historically been fed values this way, so
/// the cast is kept, but callers should convert explicitly.
pub fn encode(data_type: DataType, value: &Value) -> Result<Vec<u8>> {
    match data_type {
        DataType::VisibleString => Err(ServoError::Unsupported {
            data_type,
            operation: "encode",
        }),
        DataType::Real32 => match value.as_float() {
            Some(v) if !v.is_finite() => Err(invalid(data_type, &format!("non-finite value {}", v))),
            Some(v) => {
                let single = v as f32;
                if single.is_infinite() {
                    return Err(invalid(data_type, &format!("value {} out of range for float32", v)));
                }
                Ok(single.to_le_bytes().to_vec())
            }
            None => Err(invalid(data_type, "expected a number")),
        },
        _ => {
            let v = integer_value(data_type, value)?;
            if let Some((min, max)) = data_type.integer_range() {
                if v < 0 && min == 0 {
                    return Err(invalid(data_type, &format!("negative value {} for unsigned type", v)));
                }
                if v < min || v > max {
                    return Err(invalid(data_type, &format!("value {} out of range [{}, {}]", v, min, max)));
                }
            }
            Ok(integer_to_bytes(data_type, v))
        }
    }
}

/// Decode the wire bytes of a register into its logical value.
pub fn decode(data_type: DataType, bytes: &[u8]) -> Result<Value> {
    let expected = match data_type.size() {
        Some(size) => size,
        None => return decode_string(bytes),
    };
    if bytes.len() != expected {
        return Err(ServoError::MalformedReply {
            data_type,
            expected,
            actual: bytes.len(),
        });
    }

    macro_rules! le {
        ($t:ty) => {{
            let mut arr = [0u8; core::mem::size_of::<$t>()];
            arr.copy_from_slice(bytes);
            <$t>::from_le_bytes(arr)
        }};
    }

    let value = match data_type {
        DataType::Unsigned8 => Value::Integer(le!(u8) as i128),
        DataType::Integer8 => Value::Integer(le!(i8) as i128),
        DataType::Unsigned16 => Value::Integer(le!(u16) as i128),
        DataType::Integer16 => Value::Integer(le!(i16) as i128),
        DataType::Unsigned32 => Value::Integer(le!(u32) as i128),
        DataType::Integer32 => Value::Integer(le!(i32) as i128),
        DataType::Unsigned64 => Value::Integer(le!(u64) as i128),
        DataType::Integer64 => Value::Integer(le!(i64) as i128),
        DataType::Real32 => Value::Float(le!(f32) as f64),
        DataType::VisibleString => return decode_string(bytes),
    };
    Ok(value)
}

fn decode_string(bytes: &[u8]) -> Result<Value> {
    // Drives pad fixed string buffers with NULs.
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    core::str::from_utf8(&bytes[..end])
        .map(|s| Value::Text(s.to_string()))
        .map_err(|e| invalid(DataType::VisibleString, &format!("invalid UTF-8: {}", e)))
}

fn integer_value(data_type: DataType, value: &Value) -> Result<i128> {
    match value {
        Value::Integer(v) => Ok(*v),
        Value::Float(f) if f.is_finite() => Ok(f.trunc() as i128),
        Value::Float(f) => Err(invalid(data_type, &format!("cannot truncate {}", f))),
        Value::Text(_) => Err(invalid(data_type, "expected a number")),
    }
}

// `v` must already be within the range of `data_type`.
fn integer_to_bytes(data_type: DataType, v: i128) -> Vec<u8> {
    match data_type {
        DataType::Unsigned8 => (v as u8).to_le_bytes().to_vec(),
        DataType::Integer8 => (v as i8).to_le_bytes().to_vec(),
        DataType::Unsigned16 => (v as u16).to_le_bytes().to_vec(),
        DataType::Integer16 => (v as i16).to_le_bytes().to_vec(),
        DataType::Unsigned32 => (v as u32).to_le_bytes().to_vec(),
        DataType::Integer32 => (v as i32).to_le_bytes().to_vec(),
        DataType::Unsigned64 => (v as u64).to_le_bytes().to_vec(),
        DataType::Integer64 => (v as i64).to_le_bytes().to_vec(),
        DataType::Real32 | DataType::VisibleString => Vec::new(),
    }
}

fn invalid(data_type: DataType, reason: &str) -> ServoError {
    ServoError::InvalidValue {
        data_type,
        reason: reason.to_string(),
    }
}

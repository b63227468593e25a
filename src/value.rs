use crate::data_type::DataType;
use crate::error::{Result, ServoError};
use crate::prelude::*;
use crate::util;

/// Logical value of a register, independent of its wire width.
///
/// All integer types share one variant wide enough for both `u64` and `i64`,
/// so a value decoded from a register compares equal to the value that was
/// written to it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Integer(i128),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parse the textual form of a value of the given type, as found in
    /// dictionary storage dumps. Integers may be decimal or `0x` hex; a
    /// fractional number given for an integer type is kept as a float and
    /// truncated when written.
    pub fn parse(data_type: DataType, text: &str) -> Result<Value> {
        let invalid = || ServoError::InvalidValue {
            data_type,
            reason: format!("cannot parse '{}'", text),
        };
        match data_type {
            DataType::VisibleString => Ok(Value::Text(text.to_string())),
            DataType::Real32 => text.trim().parse::<f64>().map(Value::Float).map_err(|_| invalid()),
            _ => {
                if let Some(v) = util::parse_number::<i128>(text) {
                    Ok(Value::Integer(v))
                } else {
                    text.trim().parse::<f64>().map(Value::Float).map_err(|_| invalid())
                }
            }
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(val: $t) -> Self {
                Value::Integer(val as i128)
            }
        })*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<f32> for Value {
    fn from(val: f32) -> Self {
        Value::Float(val as f64)
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::Float(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::Text(val.to_string())
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::Text(val)
    }
}

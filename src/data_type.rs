use core::str::FromStr;

use crate::prelude::*;

/// Wire data type of a drive register.
///
/// The discriminants are the CiA 301 data type codes, so a descriptor built
/// from an object dictionary entry can go through [`DataType::from_code`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    Integer8 = 0x2,
    Integer16 = 0x3,
    Integer32 = 0x4,
    Unsigned8 = 0x5,
    Unsigned16 = 0x6,
    Unsigned32 = 0x7,
    Real32 = 0x8,
    VisibleString = 0x9,
    Integer64 = 0x15,
    Unsigned64 = 0x1B,
}

impl DataType {
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0x2 => Some(DataType::Integer8),
            0x3 => Some(DataType::Integer16),
            0x4 => Some(DataType::Integer32),
            0x5 => Some(DataType::Unsigned8),
            0x6 => Some(DataType::Unsigned16),
            0x7 => Some(DataType::Unsigned32),
            0x8 => Some(DataType::Real32),
            0x9 => Some(DataType::VisibleString),
            0x15 => Some(DataType::Integer64),
            0x1B => Some(DataType::Unsigned64),
            _ => None,
        }
    }

    pub fn code(&self) -> u16 {
        *self as u16
    }

    // Wire width in bytes, `None` for variable length strings.
    pub fn size(&self) -> Option<usize> {
        match self {
            DataType::Integer8 | DataType::Unsigned8 => Some(1),
            DataType::Integer16 | DataType::Unsigned16 => Some(2),
            DataType::Integer32 | DataType::Unsigned32 | DataType::Real32 => Some(4),
            DataType::Integer64 | DataType::Unsigned64 => Some(8),
            DataType::VisibleString => None,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            DataType::Integer8 | DataType::Integer16 | DataType::Integer32 | DataType::Integer64
        )
    }

    pub fn is_integer(&self) -> bool {
        !matches!(self, DataType::Real32 | DataType::VisibleString)
    }

    /// Inclusive range of logical values an integer type can carry.
    pub fn integer_range(&self) -> Option<(i128, i128)> {
        match self {
            DataType::Integer8 => Some((i8::MIN as i128, i8::MAX as i128)),
            DataType::Integer16 => Some((i16::MIN as i128, i16::MAX as i128)),
            DataType::Integer32 => Some((i32::MIN as i128, i32::MAX as i128)),
            DataType::Integer64 => Some((i64::MIN as i128, i64::MAX as i128)),
            DataType::Unsigned8 => Some((0, u8::MAX as i128)),
            DataType::Unsigned16 => Some((0, u16::MAX as i128)),
            DataType::Unsigned32 => Some((0, u32::MAX as i128)),
            DataType::Unsigned64 => Some((0, u64::MAX as i128)),
            DataType::Real32 | DataType::VisibleString => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataType::Integer8 => "s8",
            DataType::Integer16 => "s16",
            DataType::Integer32 => "s32",
            DataType::Integer64 => "s64",
            DataType::Unsigned8 => "u8",
            DataType::Unsigned16 => "u16",
            DataType::Unsigned32 => "u32",
            DataType::Unsigned64 => "u64",
            DataType::Real32 => "float",
            DataType::VisibleString => "str",
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = String;

    /// Accepts the short names used by drive dictionaries ("u16", "s32",
    /// "float", "str").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s8" => Ok(DataType::Integer8),
            "s16" => Ok(DataType::Integer16),
            "s32" => Ok(DataType::Integer32),
            "s64" => Ok(DataType::Integer64),
            "u8" => Ok(DataType::Unsigned8),
            "u16" => Ok(DataType::Unsigned16),
            "u32" => Ok(DataType::Unsigned32),
            "u64" => Ok(DataType::Unsigned64),
            "float" | "float32" => Ok(DataType::Real32),
            "str" | "string" => Ok(DataType::VisibleString),
            _ => Err(format!("unknown data type '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(DataType::from_code(0x2), Some(DataType::Integer8));
        assert_eq!(DataType::from_code(0x3), Some(DataType::Integer16));
        assert_eq!(DataType::from_code(0x4), Some(DataType::Integer32));
        assert_eq!(DataType::from_code(0x5), Some(DataType::Unsigned8));
        assert_eq!(DataType::from_code(0x6), Some(DataType::Unsigned16));
        assert_eq!(DataType::from_code(0x7), Some(DataType::Unsigned32));
        assert_eq!(DataType::from_code(0x8), Some(DataType::Real32));
        assert_eq!(DataType::from_code(0x9), Some(DataType::VisibleString));
        assert_eq!(DataType::from_code(0x15), Some(DataType::Integer64));
        assert_eq!(DataType::from_code(0x1B), Some(DataType::Unsigned64));
        // Boolean, Real64 and domains are not register types of a servo drive.
        assert_eq!(DataType::from_code(0x1), None);
        assert_eq!(DataType::from_code(0x11), None);
        assert_eq!(DataType::from_code(0xFF), None);
    }

    #[test]
    fn test_size() {
        assert_eq!(DataType::Integer8.size(), Some(1));
        assert_eq!(DataType::Integer16.size(), Some(2));
        assert_eq!(DataType::Integer32.size(), Some(4));
        assert_eq!(DataType::Integer64.size(), Some(8));
        assert_eq!(DataType::Unsigned8.size(), Some(1));
        assert_eq!(DataType::Unsigned16.size(), Some(2));
        assert_eq!(DataType::Unsigned32.size(), Some(4));
        assert_eq!(DataType::Unsigned64.size(), Some(8));
        assert_eq!(DataType::Real32.size(), Some(4));
        assert_eq!(DataType::VisibleString.size(), None);
    }

    #[test]
    fn test_code_round_trip() {
        for dt in [DataType::Integer8, DataType::Unsigned64, DataType::Real32, DataType::VisibleString] {
            assert_eq!(DataType::from_code(dt.code()), Some(dt));
        }
    }

    #[test]
    fn test_integer_range() {
        assert_eq!(DataType::Unsigned16.integer_range(), Some((0, 0xFFFF)));
        assert_eq!(DataType::Integer8.integer_range(), Some((-128, 127)));
        assert_eq!(DataType::Real32.integer_range(), None);
        assert!(DataType::Integer32.is_signed());
        assert!(!DataType::Unsigned32.is_signed());
        assert!(!DataType::VisibleString.is_integer());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("u16".parse::<DataType>(), Ok(DataType::Unsigned16));
        assert_eq!("S32".parse::<DataType>(), Ok(DataType::Integer32));
        assert_eq!("float".parse::<DataType>(), Ok(DataType::Real32));
        assert_eq!("str".parse::<DataType>(), Ok(DataType::VisibleString));
        assert!("bool".parse::<DataType>().is_err());
    }
}

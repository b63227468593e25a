use core::str::FromStr;

pub trait ParseRadix: FromStr {
    fn from_str_radix(s: &str, radix: u32) -> Option<Self>
        where
            Self: Sized;
}

// Hex literals in drive dictionaries are raw bit patterns, so "0xFF" read as
// an i8 is -1 rather than an overflow.
macro_rules! impl_parse_radix_signed {
    ($signed:ty, $unsigned:ty) => {
        impl ParseRadix for $signed {
            fn from_str_radix(s: &str, radix: u32) -> Option<Self> {
                <$unsigned>::from_str_radix(s, radix).ok().map(|val| val as $signed)
            }
        }
    };
}

impl_parse_radix_signed!(i8, u8);
impl_parse_radix_signed!(i16, u16);
impl_parse_radix_signed!(i32, u32);
impl_parse_radix_signed!(i64, u64);
impl_parse_radix_signed!(i128, u128);

macro_rules! impl_parse_radix_for {
    ($t:ty) => {
        impl ParseRadix for $t {
            fn from_str_radix(s: &str, radix: u32) -> Option<Self> {
                <$t>::from_str_radix(s, radix).ok()
            }
        }
    };
}

impl_parse_radix_for!(u8);
impl_parse_radix_for!(u16);
impl_parse_radix_for!(u32);
impl_parse_radix_for!(u64);

/// Parse a decimal or `0x` prefixed hexadecimal number.
pub fn parse_number<T: ParseRadix>(s: &str) -> Option<T> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        T::from_str_radix(hex, 16)
    } else {
        s.parse().ok()
    }
}

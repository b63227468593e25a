pub use hashbrown::HashMap;
pub use std::fmt::{self, Debug, Display};
pub use std::time::{Duration, Instant};

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        log::info!("[servo] {}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        log::debug!("[servo] {}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        log::warn!("[servo] {}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        log::error!("[servo] {}", format_args!($($arg)*))
    };
}

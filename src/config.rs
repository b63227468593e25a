use crate::constant::{FAULT_RESET_RETRIES, PDS_POLL_INTERVAL, PDS_TIMEOUT};
use crate::prelude::*;

/// Timing and retry settings of a [`Servo`](crate::servo::Servo).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ServoConfig {
    /// Bound of each status word wait issued by `disable` and `fault_reset`.
    pub pds_timeout: Duration,
    /// Reset pulses sent by `fault_reset` before giving up.
    pub fault_reset_retries: u32,
    /// Sleep between two status word polls. Zero polls back to back.
    pub poll_interval: Duration,
}

impl Default for ServoConfig {
    fn default() -> Self {
        ServoConfig {
            pds_timeout: PDS_TIMEOUT,
            fault_reset_retries: FAULT_RESET_RETRIES,
            poll_interval: PDS_POLL_INTERVAL,
        }
    }
}

impl ServoConfig {
    pub fn with_pds_timeout(mut self, timeout: Duration) -> Self {
        self.pds_timeout = timeout;
        self
    }

    pub fn with_fault_reset_retries(mut self, retries: u32) -> Self {
        self.fault_reset_retries = retries;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

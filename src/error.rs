use thiserror::Error;

use crate::data_type::DataType;
use crate::pds::PdsState;
use crate::prelude::*;
use crate::register::{Access, RegisterId};

pub type Result<T, E = ServoError> = core::result::Result<T, E>;

/// Errors surfaced by register access and the PDS driver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServoError {
    #[error("invalid register reference: {0}")]
    InvalidRegisterReference(String),

    #[error("no dictionary loaded")]
    NoDictionary,

    #[error("unknown register '{name}' on subnode {subnode}")]
    UnknownRegister { name: String, subnode: u8 },

    #[error("cannot {operation} {register}: register is {access}")]
    AccessViolation {
        register: RegisterId,
        access: Access,
        operation: &'static str,
    },

    #[error("malformed {data_type} reply: expected {expected} bytes, got {actual}")]
    MalformedReply {
        data_type: DataType,
        expected: usize,
        actual: usize,
    },

    #[error("invalid value for {data_type}: {reason}")]
    InvalidValue { data_type: DataType, reason: String },

    #[error("{operation} is not supported for {data_type}")]
    Unsupported {
        data_type: DataType,
        operation: &'static str,
    },

    #[error("transport error on {register}: {cause}")]
    Transport {
        register: RegisterId,
        #[source]
        cause: TransportError,
    },

    #[error("{operation} timed out after {timeout:?}")]
    TimedOut {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("drive still in {state:?} after {attempts} fault reset attempts")]
    StateError { state: PdsState, attempts: u32 },

    #[error("homing failed on subnode {subnode} (status word {status_word:#06x})")]
    HomingFailed { subnode: u8, status_word: u16 },
}

/// Failure reported by a [`Transport`](crate::transport::Transport)
/// implementation for one wire transaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transfer aborted by drive: {0}")]
    Abort(SdoAbortCode),

    #[error("transaction timed out")]
    Timeout,

    #[error("malformed reply: {0}")]
    MalformedReply(String),

    #[error("link error: {0}")]
    Link(String),
}

macro_rules! sdo_abort_codes {
    ($($name:ident = $code:literal => $desc:literal,)*) => {
        /// CiA 301 SDO abort codes, as reported by a drive refusing a transfer.
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub enum SdoAbortCode {
            $($name,)*
        }

        impl SdoAbortCode {
            pub fn code(&self) -> u32 {
                match *self {
                    $(SdoAbortCode::$name => $code,)*
                }
            }

            pub fn description(&self) -> &'static str {
                match *self {
                    $(SdoAbortCode::$name => $desc,)*
                }
            }

            pub fn from_code(code: u32) -> Option<Self> {
                match code {
                    $($code => Some(SdoAbortCode::$name),)*
                    _ => None,
                }
            }
        }
    };
}

sdo_abort_codes! {
    ToggleBitNotAlternated = 0x0503_0000 => "Toggle bit not alternated",
    SdoProtocolTimedOut = 0x0504_0000 => "SDO protocol timed out",
    CommandSpecifierNotValidOrUnknown = 0x0504_0001 => "Client/server command specifier not valid or unknown",
    InvalidBlockSize = 0x0504_0002 => "Invalid block size",
    InvalidSequenceNumber = 0x0504_0003 => "Invalid sequence number",
    CrcError = 0x0504_0004 => "CRC error",
    OutOfMemory = 0x0504_0005 => "Out of memory",
    UnsupportedAccessToObject = 0x0601_0000 => "Unsupported access to an object",
    AttemptToReadWriteOnlyObject = 0x0601_0001 => "Attempt to read a write only object",
    AttemptToWriteReadOnlyObject = 0x0601_0002 => "Attempt to write a read only object",
    ObjectDoesNotExist = 0x0602_0000 => "Object does not exist in the object dictionary",
    ObjectCannotBeMappedToPdo = 0x0604_0041 => "Object cannot be mapped to the PDO",
    ExceedPdoSize = 0x0604_0042 => "The number and length of the objects to be mapped would exceed PDO length",
    GeneralParameterIncompatibility = 0x0604_0043 => "General parameter incompatibility reason",
    GeneralInternalIncompatibility = 0x0604_0047 => "General internal incompatibility in the device",
    HardwareError = 0x0606_0000 => "Access failed due to a hardware error",
    LengthMismatch = 0x0607_0010 => "Data type does not match; length of service parameter does not match",
    LengthTooHigh = 0x0607_0012 => "Data type does not match; length of service parameter too high",
    LengthTooLow = 0x0607_0013 => "Data type does not match; length of service parameter too low",
    SubIndexDoesNotExist = 0x0609_0011 => "Sub-index does not exist",
    ValueRangeExceeded = 0x0609_0030 => "Value range of parameter exceeded",
    ValueWrittenTooHigh = 0x0609_0031 => "Value of parameter written too high",
    ValueWrittenTooLow = 0x0609_0032 => "Value of parameter written too low",
    MaxValueLessThanMinValue = 0x0609_0036 => "Maximum value is less than minimum value",
    GeneralError = 0x0800_0000 => "General error",
    DataTransferOrStoreFailed = 0x0800_0020 => "Data cannot be transferred or stored to the application",
    StoreFailedDueToLocalControl = 0x0800_0021 => "Data cannot be transferred or stored because of local control",
    StoreFailedDueToDeviceState = 0x0800_0022 => "Data cannot be transferred or stored because of the present device state",
    ObjectDictionaryNotPresent = 0x0800_0023 => "Object dictionary dynamic generation fails or no object dictionary is present",
}

impl Display for SdoAbortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x} ({})", self.code(), self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::Address;

    #[test]
    fn test_abort_code_table() {
        assert_eq!(SdoAbortCode::AttemptToWriteReadOnlyObject.code(), 0x0601_0002);
        assert_eq!(SdoAbortCode::from_code(0x0602_0000), Some(SdoAbortCode::ObjectDoesNotExist));
        assert_eq!(SdoAbortCode::from_code(0x0800_0020), Some(SdoAbortCode::DataTransferOrStoreFailed));
        assert_eq!(SdoAbortCode::from_code(0x1234_5678), None);
    }

    #[test]
    fn test_abort_code_display() {
        let msg = format!("{}", SdoAbortCode::SubIndexDoesNotExist);
        assert_eq!(msg, "0x06090011 (Sub-index does not exist)");
    }

    #[test]
    fn test_transport_error_carries_register() {
        let err = ServoError::Transport {
            register: RegisterId {
                identifier: Some("STATUS_WORD".to_string()),
                address: Address::new(0x6041, 0),
                subnode: 1,
            },
            cause: TransportError::Abort(SdoAbortCode::HardwareError),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("STATUS_WORD"), "{}", msg);
        assert!(msg.contains("0x6041:00"), "{}", msg);
        assert!(msg.contains("hardware error"), "{}", msg);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_state_error_display() {
        let err = ServoError::StateError { state: PdsState::Fault, attempts: 20 };
        assert_eq!(format!("{}", err), "drive still in Fault after 20 fault reset attempts");
        let err = ServoError::HomingFailed { subnode: 1, status_word: 0x2237 };
        assert_eq!(format!("{}", err), "homing failed on subnode 1 (status word 0x2237)");
    }
}

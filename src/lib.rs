//! Host side driver of CiA 402 servo drives: typed register access against
//! an SDO-style transport and sequencing of the power drive state machine.

pub mod codec;
pub mod config;
pub mod constant;
pub mod data_type;
pub mod dictionary;
pub mod error;
pub mod motion;
pub mod pds;
pub mod pds_word;
pub mod register;
pub mod servo;
pub mod storage;
pub mod subscription;
pub mod transport;
pub mod util;
pub mod value;

mod prelude;

pub use config::ServoConfig;
pub use data_type::DataType;
pub use dictionary::{Dictionary, ErrorInfo, MemoryDictionary};
pub use error::{Result, SdoAbortCode, ServoError, TransportError};
pub use motion::PositionSetpoint;
pub use pds::{decode_state, OperationMode, PdsState};
pub use pds_word::{ControlWord, PdsCommand, StatusWord};
pub use register::{Access, Address, Cyclic, RegisterDescriptor, RegisterId, RegisterRef};
pub use servo::{Servo, ServoInfo};
pub use storage::{Storage, StorageReport};
pub use transport::Transport;
pub use value::Value;

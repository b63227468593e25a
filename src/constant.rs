use crate::prelude::*;

/// Dictionary names of the registers the driver itself needs.
pub const STATUS_WORD: &str = "STATUS_WORD";
pub const CONTROL_WORD: &str = "CONTROL_WORD";
pub const STORE_ALL: &str = "STORE_ALL";
pub const STORE_COMM: &str = "STORE_COMM";
pub const STORE_APP: &str = "STORE_APP";
pub const MODES_OF_OPERATION: &str = "MODES_OF_OPERATION";
pub const MODES_OF_OPERATION_DISPLAY: &str = "MODES_OF_OPERATION_DISPLAY";
pub const SERIAL_NUMBER: &str = "SERIAL_NUMBER";
pub const PRODUCT_CODE: &str = "PRODUCT_CODE";
pub const SOFTWARE_VERSION: &str = "SOFTWARE_VERSION";
pub const REVISION_NUMBER: &str = "REVISION_NUMBER";
pub const POSITION_ACTUAL: &str = "POSITION_ACTUAL";
pub const TARGET_POSITION: &str = "TARGET_POSITION";
pub const VELOCITY_ACTUAL: &str = "VELOCITY_ACTUAL";
pub const TARGET_VELOCITY: &str = "TARGET_VELOCITY";
pub const TORQUE_ACTUAL: &str = "TORQUE_ACTUAL";
pub const TARGET_TORQUE: &str = "TARGET_TORQUE";

/// CiA 301 / CiA 402 standard object indexes
pub(crate) const REG_STORE_PARAMETERS: u16 = 0x1010;
pub(crate) const REG_CONTROL_WORD: u16 = 0x6040;
pub(crate) const REG_STATUS_WORD: u16 = 0x6041;
pub(crate) const REG_MODES_OF_OPERATION: u16 = 0x6060;
pub(crate) const REG_MODES_OF_OPERATION_DISPLAY: u16 = 0x6061;
pub(crate) const REG_POSITION_ACTUAL: u16 = 0x6064;
pub(crate) const REG_VELOCITY_ACTUAL: u16 = 0x606C;
pub(crate) const REG_TARGET_TORQUE: u16 = 0x6071;
pub(crate) const REG_TORQUE_ACTUAL: u16 = 0x6077;
pub(crate) const REG_TARGET_POSITION: u16 = 0x607A;
pub(crate) const REG_TARGET_VELOCITY: u16 = 0x60FF;

/// Object index offset between CiA 402 logical devices (axes).
pub(crate) const CIA402_AXIS_OFFSET: u16 = 0x800;

/// Writing this to a store register persists parameters to NVM ("save").
pub const STORE_MAGIC: u32 = 0x6576_6173;

/// PDS status word (mask, pattern) pairs.
pub(crate) const PDS_STA_NRTSO_MSK: u16 = 0x004F;
pub(crate) const PDS_STA_NRTSO: u16 = 0x0000;
pub(crate) const PDS_STA_SOD_MSK: u16 = 0x004F;
pub(crate) const PDS_STA_SOD: u16 = 0x0040;
pub(crate) const PDS_STA_RTSO_MSK: u16 = 0x006F;
pub(crate) const PDS_STA_RTSO: u16 = 0x0021;
pub(crate) const PDS_STA_SO_MSK: u16 = 0x006F;
pub(crate) const PDS_STA_SO: u16 = 0x0023;
pub(crate) const PDS_STA_OE_MSK: u16 = 0x006F;
pub(crate) const PDS_STA_OE: u16 = 0x0027;
pub(crate) const PDS_STA_QSA_MSK: u16 = 0x006F;
pub(crate) const PDS_STA_QSA: u16 = 0x0007;
pub(crate) const PDS_STA_FRA_MSK: u16 = 0x004F;
pub(crate) const PDS_STA_FRA: u16 = 0x000F;
pub(crate) const PDS_STA_F_MSK: u16 = 0x004F;
pub(crate) const PDS_STA_F: u16 = 0x0008;

/// Defaults of [`ServoConfig`](crate::config::ServoConfig)
pub const PDS_TIMEOUT: Duration = Duration::from_millis(1000);
pub const FAULT_RESET_RETRIES: u32 = 20;
pub const PDS_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Default bound of the set-point acknowledge of a position set-point.
pub const SP_TIMEOUT: Duration = Duration::from_millis(1000);

use canopen_servo::{
    Access, Address, DataType, ErrorInfo, MemoryDictionary, RegisterDescriptor, ServoConfig,
};
use std::time::Duration;

pub const PROFILE_VELOCITY: &str = "PROFILE_VELOCITY";
pub const TARGET_POSITION: &str = "TARGET_POSITION";
pub const CURRENT_LOOP_KP: &str = "CURRENT_LOOP_KP";
pub const COMMAND_PASSWORD: &str = "COMMAND_PASSWORD";
pub const MOTOR_TEMPERATURE: &str = "MOTOR_TEMPERATURE";

pub const OVER_CURRENT: u32 = 0x0000_2280;

fn reg(name: &str, index: u16, subindex: u8, data_type: DataType, access: Access) -> RegisterDescriptor {
    RegisterDescriptor::new(Address::new(index, subindex), data_type, access).with_identifier(name)
}

lazy_static! {
    pub static ref REGISTERS: Vec<RegisterDescriptor> = vec![
        reg("STATUS_WORD", 0x6041, 0, DataType::Unsigned16, Access::ReadOnly),
        reg("CONTROL_WORD", 0x6040, 0, DataType::Unsigned16, Access::ReadWrite),
        reg("SERIAL_NUMBER", 0x1018, 4, DataType::Unsigned32, Access::ReadOnly),
        reg("PRODUCT_CODE", 0x1018, 2, DataType::Unsigned32, Access::ReadOnly),
        reg("REVISION_NUMBER", 0x1018, 3, DataType::Unsigned32, Access::ReadOnly),
        reg("SOFTWARE_VERSION", 0x100A, 0, DataType::VisibleString, Access::ReadOnly),
        reg(PROFILE_VELOCITY, 0x6081, 0, DataType::Unsigned32, Access::ReadWrite).with_units("cnt/s"),
        reg(TARGET_POSITION, 0x607A, 0, DataType::Integer32, Access::ReadWrite).with_units("cnt"),
        reg(CURRENT_LOOP_KP, 0x2100, 1, DataType::Real32, Access::ReadWrite),
        reg(COMMAND_PASSWORD, 0x2020, 0, DataType::Unsigned32, Access::WriteOnly),
        reg(MOTOR_TEMPERATURE, 0x2030, 0, DataType::Integer16, Access::ReadOnly).with_units("0.1 C"),
    ];
}

pub fn dictionary() -> MemoryDictionary {
    let mut dict = MemoryDictionary::from_registers(REGISTERS.iter().cloned())
        .expect("fixture registers are consistent");
    dict.add_error(ErrorInfo::new(OVER_CURRENT, "Power stage", "cyclic", "Over-current"));
    dict
}

pub fn descriptor(name: &str) -> RegisterDescriptor {
    REGISTERS
        .iter()
        .find(|r| r.identifier() == Some(name))
        .cloned()
        .unwrap_or_else(|| panic!("no fixture register {}", name))
}

/// Short waits so that timeout paths finish quickly.
pub fn fast_config() -> ServoConfig {
    ServoConfig::default()
        .with_pds_timeout(Duration::from_millis(5))
        .with_fault_reset_retries(3)
        .with_poll_interval(Duration::from_millis(1))
}

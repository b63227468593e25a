use std::borrow::Cow;

use crate::codec;
use crate::config::ServoConfig;
use crate::constant::*;
use crate::data_type::DataType;
use crate::dictionary::{Dictionary, ErrorInfo, MemoryDictionary};
use crate::error::{Result, ServoError, TransportError};
use crate::pds::PdsState;
use crate::pds_word::StatusWord;
use crate::prelude::*;
use crate::register::{Access, Address, RegisterDescriptor, RegisterRef};
use crate::subscription::{Slot, Subscriptions};
use crate::transport::Transport;
use crate::value::Value;
use crate::{debug, warn};

/// Identity of the connected drive.
#[derive(Clone, Debug, PartialEq)]
pub struct ServoInfo {
    pub serial: Value,
    pub name: String,
    pub sw_version: Value,
    pub hw_variant: String,
    pub product_code: Value,
    pub revision: Value,
}

/// Host side handle of one servo drive.
///
/// Not synchronized: a host sharing it between threads must wrap it in a
/// lock of its own.
pub struct Servo<T: Transport, D: Dictionary = MemoryDictionary> {
    pub(crate) transport: T,
    pub(crate) dictionary: Option<D>,
    pub(crate) config: ServoConfig,
    pub(crate) subscriptions: Subscriptions,
    pub(crate) last_states: HashMap<u8, PdsState>,
}

impl<T: Transport, D: Dictionary> Servo<T, D> {
    pub fn new(transport: T) -> Self {
        Servo {
            transport,
            dictionary: None,
            config: ServoConfig::default(),
            subscriptions: Subscriptions::default(),
            last_states: HashMap::new(),
        }
    }

    pub fn with_dictionary(mut self, dictionary: D) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    pub fn with_config(mut self, config: ServoConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the current dictionary.
    pub fn load_dictionary(&mut self, dictionary: D) {
        debug!("dictionary reloaded");
        self.dictionary = Some(dictionary);
    }

    pub fn dictionary(&self) -> Option<&D> {
        self.dictionary.as_ref()
    }

    pub fn config(&self) -> &ServoConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Read a register and decode it according to its data type.
    ///
    /// A name is resolved on `subnode`; a descriptor is used as is and
    /// addressed on its own subnode.
    pub fn read<'a>(&mut self, reg: impl Into<RegisterRef<'a>>, subnode: u8) -> Result<Value> {
        let reg = resolve(self.dictionary.as_ref(), reg.into(), subnode)?;
        read_register(&mut self.transport, reg)
    }

    /// Encode a value according to the register data type and write it.
    pub fn write<'a>(
        &mut self,
        reg: impl Into<RegisterRef<'a>>,
        value: impl Into<Value>,
        subnode: u8,
    ) -> Result<()> {
        let reg = resolve(self.dictionary.as_ref(), reg.into(), subnode)?;
        write_register(&mut self.transport, reg, &value.into())
    }

    /// Access to one of the registers the driver needs, by dictionary name
    /// when the dictionary has it, at its standard address otherwise.
    pub(crate) fn read_known(&mut self, name: &str, subnode: u8) -> Result<Value> {
        let reg = known_register(self.dictionary.as_ref(), name, subnode)?;
        read_register(&mut self.transport, &reg)
    }

    pub(crate) fn write_known(&mut self, name: &str, value: Value, subnode: u8) -> Result<()> {
        let reg = known_register(self.dictionary.as_ref(), name, subnode)?;
        write_register(&mut self.transport, &reg, &value)
    }

    /// Store all current parameters to the drive NVM.
    pub fn store_all(&mut self, subnode: u8) -> Result<()> {
        self.write_known(STORE_ALL, Value::from(STORE_MAGIC), subnode)
    }

    /// Store the communication parameters to the drive NVM.
    pub fn store_comm(&mut self, subnode: u8) -> Result<()> {
        self.write_known(STORE_COMM, Value::from(STORE_MAGIC), subnode)
    }

    /// Store the application parameters to the drive NVM.
    pub fn store_app(&mut self, subnode: u8) -> Result<()> {
        self.write_known(STORE_APP, Value::from(STORE_MAGIC), subnode)
    }

    pub fn info(&mut self, subnode: u8) -> Result<ServoInfo> {
        Ok(ServoInfo {
            serial: self.read(SERIAL_NUMBER, subnode)?,
            name: "Drive".to_string(),
            sw_version: self.read(SOFTWARE_VERSION, subnode)?,
            hw_variant: "A".to_string(),
            product_code: self.read(PRODUCT_CODE, subnode)?,
            revision: self.read(REVISION_NUMBER, subnode)?,
        })
    }

    pub fn errors(&self) -> Result<&HashMap<u32, ErrorInfo>> {
        self.dictionary
            .as_ref()
            .map(|d| d.errors())
            .ok_or(ServoError::NoDictionary)
    }

    pub fn error_info(&self, code: u32) -> Option<&ErrorInfo> {
        self.dictionary.as_ref().and_then(|d| d.errors().get(&code))
    }

    pub fn state_subscribe<F>(&mut self, cb: F) -> Slot
    where
        F: FnMut(PdsState, StatusWord, u8) + Send + 'static,
    {
        self.subscriptions.add_state(Box::new(cb))
    }

    pub fn state_unsubscribe(&mut self, slot: Slot) -> bool {
        self.subscriptions.remove_state(slot)
    }

    pub fn emcy_subscribe<F>(&mut self, cb: F) -> Slot
    where
        F: FnMut(u32) + Send + 'static,
    {
        self.subscriptions.add_emcy(Box::new(cb))
    }

    pub fn emcy_unsubscribe(&mut self, slot: Slot) -> bool {
        self.subscriptions.remove_emcy(slot)
    }

    /// Forward an emergency code received by the transport to the emergency
    /// subscribers.
    pub fn dispatch_emergency(&mut self, code: u32) {
        match self.error_info(code) {
            Some(info) => warn!("emergency {:#010x}: {} ({})", code, info.label, info.affected_module),
            None => warn!("emergency {:#010x}", code),
        }
        self.subscriptions.notify_emcy(code);
    }
}

pub(crate) fn resolve<'a, D: Dictionary>(
    dictionary: Option<&'a D>,
    reg: RegisterRef<'a>,
    subnode: u8,
) -> Result<&'a RegisterDescriptor> {
    match reg {
        RegisterRef::Descriptor(reg) => Ok(reg),
        RegisterRef::Name("") => Err(ServoError::InvalidRegisterReference(
            "empty register name".to_string(),
        )),
        RegisterRef::Name(name) => dictionary.ok_or(ServoError::NoDictionary)?.resolve(name, subnode),
    }
}

fn known_register<'a, D: Dictionary>(
    dictionary: Option<&'a D>,
    name: &str,
    subnode: u8,
) -> Result<Cow<'a, RegisterDescriptor>> {
    if let Some(reg) = dictionary.and_then(|d| d.resolve(name, subnode).ok()) {
        return Ok(Cow::Borrowed(reg));
    }
    match standard_register(name, subnode) {
        Some(reg) => Ok(Cow::Owned(reg)),
        None if dictionary.is_none() => Err(ServoError::NoDictionary),
        None => Err(ServoError::UnknownRegister {
            name: name.to_string(),
            subnode,
        }),
    }
}

/// CiA 301 / CiA 402 descriptor of a register the driver needs.
pub fn standard_register(name: &str, subnode: u8) -> Option<RegisterDescriptor> {
    let axis = |index: u16| {
        CIA402_AXIS_OFFSET
            .checked_mul(u16::from(subnode.saturating_sub(1)))
            .and_then(|offset| index.checked_add(offset))
            .map(|index| Address::new(index, 0))
    };
    let (address, data_type, access) = match name {
        STATUS_WORD => (axis(REG_STATUS_WORD)?, DataType::Unsigned16, Access::ReadOnly),
        CONTROL_WORD => (axis(REG_CONTROL_WORD)?, DataType::Unsigned16, Access::ReadWrite),
        MODES_OF_OPERATION => (axis(REG_MODES_OF_OPERATION)?, DataType::Integer8, Access::ReadWrite),
        MODES_OF_OPERATION_DISPLAY => (
            axis(REG_MODES_OF_OPERATION_DISPLAY)?,
            DataType::Integer8,
            Access::ReadOnly,
        ),
        POSITION_ACTUAL => (axis(REG_POSITION_ACTUAL)?, DataType::Integer32, Access::ReadOnly),
        TARGET_POSITION => (axis(REG_TARGET_POSITION)?, DataType::Integer32, Access::ReadWrite),
        VELOCITY_ACTUAL => (axis(REG_VELOCITY_ACTUAL)?, DataType::Integer32, Access::ReadOnly),
        TARGET_VELOCITY => (axis(REG_TARGET_VELOCITY)?, DataType::Integer32, Access::ReadWrite),
        TORQUE_ACTUAL => (axis(REG_TORQUE_ACTUAL)?, DataType::Integer16, Access::ReadOnly),
        TARGET_TORQUE => (axis(REG_TARGET_TORQUE)?, DataType::Integer16, Access::ReadWrite),
        STORE_ALL => (Address::new(REG_STORE_PARAMETERS, 1), DataType::Unsigned32, Access::ReadWrite),
        STORE_COMM => (Address::new(REG_STORE_PARAMETERS, 2), DataType::Unsigned32, Access::ReadWrite),
        STORE_APP => (Address::new(REG_STORE_PARAMETERS, 3), DataType::Unsigned32, Access::ReadWrite),
        _ => return None,
    };
    Some(
        RegisterDescriptor::new(address, data_type, access)
            .with_identifier(name)
            .with_subnode(subnode),
    )
}

fn read_register<T: Transport>(transport: &mut T, reg: &RegisterDescriptor) -> Result<Value> {
    if !reg.access().is_readable() {
        return Err(access_violation(reg, "read"));
    }
    let bytes = transport
        .upload(reg.address(), reg.subnode())
        .map_err(|cause| transport_error(reg, cause))?;
    codec::decode(reg.data_type(), &bytes)
        .map_err(|e| transport_error(reg, TransportError::MalformedReply(e.to_string())))
}

fn write_register<T: Transport>(transport: &mut T, reg: &RegisterDescriptor, value: &Value) -> Result<()> {
    if !reg.access().is_writable() {
        return Err(access_violation(reg, "write"));
    }
    let bytes = codec::encode(reg.data_type(), value)?;
    transport
        .download(reg.address(), reg.subnode(), &bytes)
        .map_err(|cause| transport_error(reg, cause))
}

fn access_violation(reg: &RegisterDescriptor, operation: &'static str) -> ServoError {
    ServoError::AccessViolation {
        register: reg.id(),
        access: reg.access(),
        operation,
    }
}

fn transport_error(reg: &RegisterDescriptor, cause: TransportError) -> ServoError {
    ServoError::Transport {
        register: reg.id(),
        cause,
    }
}

use core::str::FromStr;

use crate::data_type::DataType;
use crate::prelude::*;
use crate::value::Value;

/// Wire location of a register: object index plus subindex.
///
/// EtherCAT style drives that address registers by a flat 16 bit address
/// use `subindex = 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address {
    pub index: u16,
    pub subindex: u8,
}

impl Address {
    pub const fn new(index: u16, subindex: u8) -> Self {
        Address { index, subindex }
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}:{:02x}", self.index, self.subindex)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    pub fn is_readable(&self) -> bool {
        !matches!(self, Access::WriteOnly)
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self, Access::ReadOnly)
    }
}

impl FromStr for Access {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rw" => Ok(Access::ReadWrite),
            "ro" | "r" => Ok(Access::ReadOnly),
            "wo" | "w" => Ok(Access::WriteOnly),
            _ => Err(format!("unknown access type '{}'", s)),
        }
    }
}

impl Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Access::ReadOnly => "read-only",
            Access::WriteOnly => "write-only",
            Access::ReadWrite => "read-write",
        })
    }
}

/// Cyclic classification of a register. Only carried for external tooling,
/// register access never looks at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cyclic {
    #[default]
    Config,
    CyclicRx,
    CyclicTx,
}

impl FromStr for Cyclic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CONFIG" => Ok(Cyclic::Config),
            "CYCLIC_RX" => Ok(Cyclic::CyclicRx),
            "CYCLIC_TX" => Ok(Cyclic::CyclicTx),
            _ => Err(format!("unknown cyclic type '{}'", s)),
        }
    }
}

/// Description of one drive parameter.
///
/// Immutable once built: the `with_*` methods consume the descriptor and are
/// meant to be chained right after [`RegisterDescriptor::new`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegisterDescriptor {
    identifier: Option<String>,
    address: Address,
    data_type: DataType,
    access: Access,
    subnode: u8,
    units: String,
    cyclic: Cyclic,
    range: Option<(Value, Value)>,
}

impl RegisterDescriptor {
    pub fn new(address: Address, data_type: DataType, access: Access) -> Self {
        RegisterDescriptor {
            identifier: None,
            address,
            data_type,
            access,
            subnode: 1,
            units: String::new(),
            cyclic: Cyclic::Config,
            range: None,
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_subnode(mut self, subnode: u8) -> Self {
        self.subnode = subnode;
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn with_cyclic(mut self, cyclic: Cyclic) -> Self {
        self.cyclic = cyclic;
        self
    }

    pub fn with_range(mut self, min: Value, max: Value) -> Self {
        self.range = Some((min, max));
        self
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
    pub fn address(&self) -> Address {
        self.address
    }
    pub fn data_type(&self) -> DataType {
        self.data_type
    }
    pub fn access(&self) -> Access {
        self.access
    }
    pub fn subnode(&self) -> u8 {
        self.subnode
    }
    pub fn units(&self) -> &str {
        &self.units
    }
    pub fn cyclic(&self) -> Cyclic {
        self.cyclic
    }
    pub fn range(&self) -> Option<&(Value, Value)> {
        self.range.as_ref()
    }

    pub fn id(&self) -> RegisterId {
        RegisterId {
            identifier: self.identifier.clone(),
            address: self.address,
            subnode: self.subnode,
        }
    }
}

/// Identity of a register in error reports.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegisterId {
    pub identifier: Option<String>,
    pub address: Address,
    pub subnode: u8,
}

impl Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identifier {
            Some(name) => write!(f, "{} ({}, subnode {})", name, self.address, self.subnode),
            None => write!(f, "{} (subnode {})", self.address, self.subnode),
        }
    }
}

/// A register given either as a resolved descriptor or by dictionary name.
#[derive(Clone, Copy, Debug)]
pub enum RegisterRef<'a> {
    Descriptor(&'a RegisterDescriptor),
    Name(&'a str),
}

impl<'a> From<&'a RegisterDescriptor> for RegisterRef<'a> {
    fn from(reg: &'a RegisterDescriptor) -> Self {
        RegisterRef::Descriptor(reg)
    }
}

impl<'a> From<&'a str> for RegisterRef<'a> {
    fn from(name: &'a str) -> Self {
        RegisterRef::Name(name)
    }
}

impl<'a> From<&'a String> for RegisterRef<'a> {
    fn from(name: &'a String) -> Self {
        RegisterRef::Name(name.as_str())
    }
}

use crate::error::{Result, ServoError};
use crate::prelude::*;
use crate::register::{Address, RegisterDescriptor};

/// Metadata of a drive error code, as listed in the drive dictionary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorInfo {
    pub id: u32,
    pub affected_module: String,
    pub error_type: String,
    pub label: String,
}

impl ErrorInfo {
    pub fn new(id: u32, affected_module: &str, error_type: &str, label: &str) -> Self {
        ErrorInfo {
            id,
            affected_module: affected_module.to_string(),
            error_type: capitalize(error_type),
            label: label.to_string(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Name to descriptor resolution for one connected drive.
pub trait Dictionary {
    fn resolve(&self, name: &str, subnode: u8) -> Result<&RegisterDescriptor>;

    fn errors(&self) -> &HashMap<u32, ErrorInfo>;

    /// All registers of a subnode, in dictionary order.
    fn registers(&self, subnode: u8) -> Vec<&RegisterDescriptor>;
}

/// In-memory [`Dictionary`], filled by whatever parses the drive's
/// dictionary file.
#[derive(Clone, Debug, Default)]
pub struct MemoryDictionary {
    registers: Vec<RegisterDescriptor>,
    name_to_index: HashMap<(u8, String), usize>,
    address_to_index: HashMap<(u8, Address), usize>,
    errors: HashMap<u32, ErrorInfo>,
}

impl MemoryDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_registers<I>(registers: I) -> Result<Self>
    where
        I: IntoIterator<Item = RegisterDescriptor>,
    {
        let mut dict = MemoryDictionary::new();
        for reg in registers {
            dict.insert(reg)?;
        }
        Ok(dict)
    }

    /// Add a named register. A register with the same name and subnode is
    /// replaced; a different name on an address already taken is rejected.
    pub fn insert(&mut self, reg: RegisterDescriptor) -> Result<()> {
        let name = reg
            .identifier()
            .ok_or_else(|| ServoError::InvalidRegisterReference(format!(
                "register {} has no identifier", reg.address())))?
            .to_string();
        let name_key = (reg.subnode(), name);
        let address_key = (reg.subnode(), reg.address());

        let existing = self.name_to_index.get(&name_key).copied();
        if let Some(&other) = self.address_to_index.get(&address_key) {
            if Some(other) != existing {
                return Err(ServoError::InvalidRegisterReference(format!(
                    "{} is already defined as {}",
                    reg.id(),
                    self.registers[other].identifier().unwrap_or("<unnamed>")
                )));
            }
        }

        match existing {
            Some(idx) => {
                let old = (self.registers[idx].subnode(), self.registers[idx].address());
                self.address_to_index.remove(&old);
                self.address_to_index.insert(address_key, idx);
                self.registers[idx] = reg;
            }
            None => {
                let idx = self.registers.len();
                self.registers.push(reg);
                self.name_to_index.insert(name_key, idx);
                self.address_to_index.insert(address_key, idx);
            }
        }
        Ok(())
    }

    pub fn add_error(&mut self, info: ErrorInfo) {
        self.errors.insert(info.id, info);
    }

    pub fn get_by_address(&self, address: Address, subnode: u8) -> Option<&RegisterDescriptor> {
        self.address_to_index
            .get(&(subnode, address))
            .map(|&idx| &self.registers[idx])
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }
}

impl Dictionary for MemoryDictionary {
    fn resolve(&self, name: &str, subnode: u8) -> Result<&RegisterDescriptor> {
        self.name_to_index
            .get(&(subnode, name.to_string()))
            .map(|&idx| &self.registers[idx])
            .ok_or_else(|| ServoError::UnknownRegister {
                name: name.to_string(),
                subnode,
            })
    }

    fn errors(&self) -> &HashMap<u32, ErrorInfo> {
        &self.errors
    }

    fn registers(&self, subnode: u8) -> Vec<&RegisterDescriptor> {
        self.registers.iter().filter(|r| r.subnode() == subnode).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;
    use crate::register::Access;

    fn reg(name: &str, index: u16, subnode: u8) -> RegisterDescriptor {
        RegisterDescriptor::new(Address::new(index, 0), DataType::Unsigned16, Access::ReadWrite)
            .with_identifier(name)
            .with_subnode(subnode)
    }

    #[test]
    fn test_resolve_by_subnode() {
        let dict = MemoryDictionary::from_registers([
            reg("CONTROL_WORD", 0x6040, 1),
            reg("CONTROL_WORD", 0x6840, 2),
        ])
        .unwrap();
        assert_eq!(dict.resolve("CONTROL_WORD", 1).unwrap().address().index, 0x6040);
        assert_eq!(dict.resolve("CONTROL_WORD", 2).unwrap().address().index, 0x6840);
        assert_eq!(
            dict.resolve("CONTROL_WORD", 3),
            Err(ServoError::UnknownRegister { name: "CONTROL_WORD".to_string(), subnode: 3 })
        );
    }

    #[test]
    fn test_insert_requires_identifier() {
        let mut dict = MemoryDictionary::new();
        let unnamed = RegisterDescriptor::new(Address::new(0x6040, 0), DataType::Unsigned16, Access::ReadWrite);
        assert!(matches!(dict.insert(unnamed), Err(ServoError::InvalidRegisterReference(_))));
        assert!(dict.is_empty());
    }

    #[test]
    fn test_address_is_unique_per_subnode() {
        let mut dict = MemoryDictionary::new();
        dict.insert(reg("A", 0x2000, 1)).unwrap();
        assert!(dict.insert(reg("B", 0x2000, 1)).is_err());
        dict.insert(reg("B", 0x2000, 2)).unwrap();
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_replace_same_name() {
        let mut dict = MemoryDictionary::new();
        dict.insert(reg("A", 0x2000, 1)).unwrap();
        dict.insert(reg("A", 0x2001, 1)).unwrap();
        assert_eq!(dict.len(), 1);
        assert!(dict.get_by_address(Address::new(0x2000, 0), 1).is_none());
        assert_eq!(
            dict.get_by_address(Address::new(0x2001, 0), 1).and_then(|r| r.identifier()),
            Some("A")
        );
    }

    #[test]
    fn test_registers_in_dictionary_order() {
        let dict = MemoryDictionary::from_registers([
            reg("B", 0x2001, 1),
            reg("A", 0x2000, 1),
            reg("C", 0x2002, 0),
        ])
        .unwrap();
        let names: Vec<_> = dict.registers(1).iter().filter_map(|r| r.identifier()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_errors() {
        let mut dict = MemoryDictionary::new();
        dict.add_error(ErrorInfo::new(0x2280, "Power stage", "CYCLIC", "Over-current"));
        let info = &dict.errors()[&0x2280];
        assert_eq!(info.error_type, "Cyclic");
        assert_eq!(info.label, "Over-current");
    }
}

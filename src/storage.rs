//! Best-effort snapshot and restore of every read-write register of the
//! dictionary. Failing registers are logged and skipped, a pass never aborts
//! halfway.

use crate::dictionary::Dictionary;
use crate::error::{Result, ServoError};
use crate::register::{Access, RegisterDescriptor};
use crate::servo::Servo;
use crate::transport::Transport;
use crate::value::Value;
use crate::{info, warn};

/// Register values keyed by dictionary name, in dictionary order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Storage {
    entries: Vec<(String, Value)>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing the previous one of the same register.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of a [`Servo::dict_storage_write`] pass.
#[derive(Debug, Default)]
pub struct StorageReport {
    pub written: Vec<String>,
    /// Stored values that do not match a writable dictionary register.
    pub skipped: Vec<String>,
    pub failed: Vec<(String, ServoError)>,
}

impl StorageReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

fn storable(reg: &RegisterDescriptor) -> bool {
    reg.access() == Access::ReadWrite && reg.identifier().is_some()
}

impl<T: Transport, D: Dictionary> Servo<T, D> {
    /// Read all read-write registers of `subnode`.
    pub fn dict_storage_read(&mut self, subnode: u8) -> Result<Storage> {
        let dictionary = self.dictionary.as_ref().ok_or(ServoError::NoDictionary)?;
        let names: Vec<String> = dictionary
            .registers(subnode)
            .into_iter()
            .filter(|reg| storable(reg))
            .filter_map(|reg| reg.identifier().map(str::to_string))
            .collect();

        let mut storage = Storage::new();
        for name in names {
            match self.read(&name, subnode) {
                Ok(value) => storage.insert(name, value),
                Err(e) => warn!("storage read of {} skipped: {}", name, e),
            }
        }
        info!("storage read: {} registers of subnode {}", storage.len(), subnode);
        Ok(storage)
    }

    /// Write back every stored value whose register is read-write.
    pub fn dict_storage_write(&mut self, storage: &Storage, subnode: u8) -> Result<StorageReport> {
        let dictionary = self.dictionary.as_ref().ok_or(ServoError::NoDictionary)?;
        let mut writable = Vec::with_capacity(storage.len());
        let mut report = StorageReport::default();
        for (name, value) in storage.iter() {
            match dictionary.resolve(name, subnode) {
                Ok(reg) if storable(reg) => writable.push((name.to_string(), value.clone())),
                _ => report.skipped.push(name.to_string()),
            }
        }

        for (name, value) in writable {
            match self.write(&name, value, subnode) {
                Ok(()) => report.written.push(name),
                Err(e) => {
                    warn!("storage write of {} skipped: {}", name, e);
                    report.failed.push((name, e));
                }
            }
        }
        info!(
            "storage write: {} written, {} skipped, {} failed",
            report.written.len(),
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }
}

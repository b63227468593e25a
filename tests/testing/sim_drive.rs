use std::collections::HashMap;

use canopen_servo::{Address, SdoAbortCode, Transport, TransportError};

pub const SW_NOT_READY: u16 = 0x0000;
pub const SW_SWITCH_ON_DISABLED: u16 = 0x0240;
pub const SW_READY_TO_SWITCH_ON: u16 = 0x0221;
pub const SW_SWITCHED_ON: u16 = 0x0233;
pub const SW_ENABLED: u16 = 0x0237;
pub const SW_QUICK_STOP: u16 = 0x0217;
pub const SW_FAULT_REACTIVE: u16 = 0x021F;
pub const SW_FAULT: u16 = 0x0208;

pub const SW_TARGET_REACHED: u16 = 0x0400;
/// Set-point acknowledge in profile position, homing attained in homing.
pub const SW_MODE_12: u16 = 0x1000;
/// Homing error in homing.
pub const SW_MODE_13: u16 = 0x2000;
const SW_MOTION: u16 = SW_TARGET_REACHED | SW_MODE_12 | SW_MODE_13;

pub fn axis_address(index: u16, subnode: u8) -> Address {
    Address::new(index + 0x800 * (subnode as u16 - 1), 0)
}

pub fn status_word_address(subnode: u8) -> Address {
    axis_address(0x6041, subnode)
}

pub fn control_word_address(subnode: u8) -> Address {
    axis_address(0x6040, subnode)
}

/// In-memory drive answering uploads and downloads from a register map, with
/// a CiA 402 reaction to control word writes.
#[derive(Debug, Default)]
pub struct SimDrive {
    registers: HashMap<(Address, u8), Vec<u8>>,
    last_control_word: HashMap<u8, u16>,
    pub uploads: usize,
    pub downloads: Vec<(Address, u8, Vec<u8>)>,
    /// Fault reset pulses are ignored.
    pub stuck_in_fault: bool,
    /// Control words are accepted but the state never changes.
    pub frozen: bool,
    /// Status word polls left before NotReady turns into SwitchOnDisabled.
    pub not_ready_polls: u32,
    pub link_down: bool,
    /// Homing ends with the homing error bit.
    pub homing_fails: bool,
    pub upload_errors: HashMap<Address, TransportError>,
    pub download_errors: HashMap<Address, TransportError>,
}

impl SimDrive {
    pub fn new() -> Self {
        let mut drive = SimDrive::default();
        drive.set_status_word(1, SW_SWITCH_ON_DISABLED);
        drive.set_u32(Address::new(0x1018, 4), 1, 0x0001_E240);
        drive.set_u32(Address::new(0x1018, 2), 1, 0x0000_0A5A);
        drive.set_u32(Address::new(0x1018, 3), 1, 0x0002_0001);
        drive.set(Address::new(0x100A, 0), 1, b"2.3.1\0\0\0".to_vec());
        drive.set_u32(Address::new(0x6081, 0), 1, 1000);
        drive.set(Address::new(0x607A, 0), 1, (-4096i32).to_le_bytes().to_vec());
        drive.set(Address::new(0x2100, 1), 1, 0.25f32.to_le_bytes().to_vec());
        drive.set(Address::new(0x2030, 0), 1, 415i16.to_le_bytes().to_vec());
        drive.set(Address::new(0x6061, 0), 1, vec![1]);
        drive.set(Address::new(0x6064, 0), 1, 0i32.to_le_bytes().to_vec());
        drive.set(Address::new(0x606C, 0), 1, 0i32.to_le_bytes().to_vec());
        drive.set(Address::new(0x6077, 0), 1, 0i16.to_le_bytes().to_vec());
        drive
    }

    pub fn with_state(mut self, subnode: u8, sw: u16) -> Self {
        self.set_status_word(subnode, sw);
        self
    }

    pub fn set(&mut self, address: Address, subnode: u8, data: Vec<u8>) {
        self.registers.insert((address, subnode), data);
    }

    pub fn set_u32(&mut self, address: Address, subnode: u8, value: u32) {
        self.set(address, subnode, value.to_le_bytes().to_vec());
    }

    pub fn get(&self, address: Address, subnode: u8) -> Option<&[u8]> {
        self.registers.get(&(address, subnode)).map(|v| v.as_slice())
    }

    pub fn set_status_word(&mut self, subnode: u8, sw: u16) {
        self.set(status_word_address(subnode), subnode, sw.to_le_bytes().to_vec());
    }

    pub fn i32_at(&self, index: u16, subnode: u8) -> i32 {
        self.get(axis_address(index, subnode), subnode)
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .unwrap_or(0)
    }

    pub fn status_word(&self, subnode: u8) -> u16 {
        self.get(status_word_address(subnode), subnode)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .unwrap_or(SW_NOT_READY)
    }

    /// Control words written to `subnode`, oldest first.
    pub fn control_words(&self, subnode: u8) -> Vec<u16> {
        let address = control_word_address(subnode);
        self.downloads
            .iter()
            .filter(|(a, s, _)| *a == address && *s == subnode)
            .map(|(_, _, d)| u16::from_le_bytes([d[0], d[1]]))
            .collect()
    }

    fn react(&mut self, subnode: u8, cw: u16) {
        let previous = self.last_control_word.insert(subnode, cw).unwrap_or(0);
        if self.frozen {
            return;
        }
        let sw = self.status_word(subnode);
        let state = sw & !SW_MOTION;
        let faulted = sw & 0x0008 != 0;
        let next = if faulted {
            let rising = cw & 0x0080 != 0 && previous & 0x0080 == 0;
            if rising && !self.stuck_in_fault {
                SW_SWITCH_ON_DISABLED
            } else {
                sw
            }
        } else if cw & 0x0082 == 0x0000 {
            SW_SWITCH_ON_DISABLED
        } else if cw & 0x0086 == 0x0002 {
            if state == SW_ENABLED {
                SW_QUICK_STOP
            } else {
                SW_SWITCH_ON_DISABLED
            }
        } else if state == SW_ENABLED && cw & 0x008F == 0x000F {
            self.react_motion(subnode, cw, previous, sw)
        } else {
            match (state, cw & 0x008F) {
                (SW_SWITCH_ON_DISABLED | SW_SWITCHED_ON | SW_ENABLED, 0x06 | 0x0E) => SW_READY_TO_SWITCH_ON,
                (SW_READY_TO_SWITCH_ON, 0x07) => SW_SWITCHED_ON,
                (SW_ENABLED, 0x07) => SW_SWITCHED_ON,
                (SW_READY_TO_SWITCH_ON | SW_SWITCHED_ON, 0x0F) => SW_ENABLED,
                _ => sw,
            }
        };
        self.set_status_word(subnode, next);
    }

    // Bit 4 handshake while operation is enabled, by mode of operation.
    fn react_motion(&mut self, subnode: u8, cw: u16, previous: u16, sw: u16) -> u16 {
        let start = cw & 0x0010 != 0;
        let rising = start && previous & 0x0010 == 0;
        let mode = self.get(axis_address(0x6061, subnode), subnode).map_or(0, |b| b[0] as i8);
        match mode {
            1 if rising => SW_ENABLED | SW_MODE_12,
            1 if !start && sw & SW_MODE_12 != 0 => {
                let target = self.i32_at(0x607A, subnode);
                let position = if cw & 0x0040 != 0 {
                    self.i32_at(0x6064, subnode) + target
                } else {
                    target
                };
                self.set(axis_address(0x6064, subnode), subnode, position.to_le_bytes().to_vec());
                SW_ENABLED | SW_TARGET_REACHED
            }
            6 if rising && self.homing_fails => SW_ENABLED | SW_MODE_13,
            6 if rising => {
                self.set(axis_address(0x6064, subnode), subnode, 0i32.to_le_bytes().to_vec());
                SW_ENABLED | SW_TARGET_REACHED | SW_MODE_12
            }
            _ => sw,
        }
    }

    // Targets show up as actual values, the selected mode as the displayed one.
    fn mirror(&mut self, address: Address, subnode: u8, data: &[u8]) {
        let mirrored = [(0x6060, 0x6061), (0x60FF, 0x606C), (0x6071, 0x6077)]
            .iter()
            .find(|(target, _)| axis_address(*target, subnode) == address)
            .map(|&(_, actual)| axis_address(actual, subnode));
        if let Some(actual) = mirrored {
            self.set(actual, subnode, data.to_vec());
        }
    }
}

impl Transport for SimDrive {
    fn upload(&mut self, address: Address, subnode: u8) -> Result<Vec<u8>, TransportError> {
        self.uploads += 1;
        if self.link_down {
            return Err(TransportError::Link("bus off".to_string()));
        }
        if let Some(e) = self.upload_errors.get(&address) {
            return Err(e.clone());
        }
        if address == status_word_address(subnode) && self.not_ready_polls > 0 {
            self.not_ready_polls -= 1;
            if self.not_ready_polls == 0 {
                self.set_status_word(subnode, SW_SWITCH_ON_DISABLED);
            } else {
                return Ok(SW_NOT_READY.to_le_bytes().to_vec());
            }
        }
        self.registers
            .get(&(address, subnode))
            .cloned()
            .ok_or(TransportError::Abort(SdoAbortCode::ObjectDoesNotExist))
    }

    fn download(&mut self, address: Address, subnode: u8, data: &[u8]) -> Result<(), TransportError> {
        if self.link_down {
            return Err(TransportError::Link("bus off".to_string()));
        }
        if let Some(e) = self.download_errors.get(&address) {
            return Err(e.clone());
        }
        self.downloads.push((address, subnode, data.to_vec()));
        if address == control_word_address(subnode) && data.len() == 2 {
            self.react(subnode, u16::from_le_bytes([data[0], data[1]]));
        } else {
            self.set(address, subnode, data.to_vec());
            self.mirror(address, subnode, data);
        }
        Ok(())
    }
}

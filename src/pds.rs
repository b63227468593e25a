//! CiA 402 power drive system (PDS) state machine, driven from the host
//! through the control word and observed through the status word.

use std::thread;

use crate::constant::*;
use crate::data_type::DataType;
use crate::dictionary::Dictionary;
use crate::error::{Result, ServoError};
use crate::pds_word::{PdsCommand, StatusWord};
use crate::prelude::*;
use crate::servo::Servo;
use crate::transport::Transport;
use crate::value::Value;
use crate::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PdsState {
    NotReady,
    SwitchOnDisabled,
    ReadyToSwitchOn,
    SwitchedOn,
    Enabled,
    QuickStop,
    FaultReactive,
    Fault,
}

impl PdsState {
    pub fn is_fault(&self) -> bool {
        matches!(self, PdsState::Fault | PdsState::FaultReactive)
    }
}

// Masks overlap, the first matching entry wins.
const STATE_TABLE: [(u16, u16, PdsState); 8] = [
    (PDS_STA_NRTSO_MSK, PDS_STA_NRTSO, PdsState::NotReady),
    (PDS_STA_SOD_MSK, PDS_STA_SOD, PdsState::SwitchOnDisabled),
    (PDS_STA_RTSO_MSK, PDS_STA_RTSO, PdsState::ReadyToSwitchOn),
    (PDS_STA_SO_MSK, PDS_STA_SO, PdsState::SwitchedOn),
    (PDS_STA_OE_MSK, PDS_STA_OE, PdsState::Enabled),
    (PDS_STA_QSA_MSK, PDS_STA_QSA, PdsState::QuickStop),
    (PDS_STA_FRA_MSK, PDS_STA_FRA, PdsState::FaultReactive),
    (PDS_STA_F_MSK, PDS_STA_F, PdsState::Fault),
];

/// Decode the PDS state from a raw status word.
pub fn decode_state(status_word: u16) -> PdsState {
    STATE_TABLE
        .iter()
        .find(|(mask, pattern, _)| status_word & mask == *pattern)
        .map_or(PdsState::NotReady, |&(_, _, state)| state)
}

/// Overall time budget of a multi-step PDS operation.
pub(crate) struct Deadline {
    operation: &'static str,
    timeout: Duration,
    start: Instant,
}

impl Deadline {
    pub(crate) fn new(operation: &'static str, timeout: Duration) -> Self {
        Deadline {
            operation,
            timeout,
            start: Instant::now(),
        }
    }

    /// Time left, or `TimedOut` once it is used up.
    pub(crate) fn remaining(&self) -> Result<Duration> {
        self.timeout
            .checked_sub(self.start.elapsed())
            .filter(|d| !d.is_zero())
            .ok_or_else(|| self.expired())
    }

    pub(crate) fn expired(&self) -> ServoError {
        ServoError::TimedOut {
            operation: self.operation,
            timeout: self.timeout,
        }
    }
}

/// CiA 402 modes of operation (0x6060 / 0x6061).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperationMode {
    #[default]
    Off,
    ProfilePosition,
    Velocity,
    ProfileVelocity,
    ProfileTorque,
    Homing,
    InterpolatedPosition,
    /// CSP
    CyclicSynchronousPosition,
    /// CSV
    CyclicSynchronousVelocity,
    /// CST
    CyclicSynchronousTorque,
}

impl OperationMode {
    pub fn code(&self) -> i8 {
        match *self {
            OperationMode::Off => 0,
            OperationMode::ProfilePosition => 1,
            OperationMode::Velocity => 2,
            OperationMode::ProfileVelocity => 3,
            OperationMode::ProfileTorque => 4,
            OperationMode::Homing => 6,
            OperationMode::InterpolatedPosition => 7,
            OperationMode::CyclicSynchronousPosition => 8,
            OperationMode::CyclicSynchronousVelocity => 9,
            OperationMode::CyclicSynchronousTorque => 10,
        }
    }

    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            0 => Some(OperationMode::Off),
            1 => Some(OperationMode::ProfilePosition),
            2 => Some(OperationMode::Velocity),
            3 => Some(OperationMode::ProfileVelocity),
            4 => Some(OperationMode::ProfileTorque),
            6 => Some(OperationMode::Homing),
            7 => Some(OperationMode::InterpolatedPosition),
            8 => Some(OperationMode::CyclicSynchronousPosition),
            9 => Some(OperationMode::CyclicSynchronousVelocity),
            10 => Some(OperationMode::CyclicSynchronousTorque),
            _ => None,
        }
    }
}

impl<T: Transport, D: Dictionary> Servo<T, D> {
    fn status_word(&mut self, subnode: u8) -> Result<u16> {
        let value = self.read_known(STATUS_WORD, subnode)?;
        let sw = value
            .as_integer()
            .and_then(|v| u16::try_from(v).ok())
            .ok_or_else(|| ServoError::InvalidValue {
                data_type: DataType::Unsigned16,
                reason: format!("status word {} does not fit 16 bits", value),
            })?;
        self.observe(sw, subnode);
        Ok(sw)
    }

    fn observe(&mut self, sw: u16, subnode: u8) {
        let state = decode_state(sw);
        if self.last_states.insert(subnode, state) != Some(state) {
            info!("subnode {}: {:?} (status word {:#06x})", subnode, state, sw);
            self.subscriptions.notify_state(state, StatusWord::from(sw), subnode);
        }
    }

    fn command(&mut self, command: PdsCommand, subnode: u8) -> Result<()> {
        debug!("subnode {}: {:?} ({:#06x})", subnode, command, command.raw());
        self.write_known(CONTROL_WORD, Value::from(command.raw()), subnode)
    }

    /// Current PDS state together with the status word it was decoded from.
    pub fn get_state(&mut self, subnode: u8) -> Result<(PdsState, StatusWord)> {
        let sw = self.status_word(subnode)?;
        Ok((decode_state(sw), StatusWord::from(sw)))
    }

    /// Poll the status word until it differs from `previous`, and return the
    /// new value. Any change ends the wait, whatever the state it decodes to.
    pub fn wait_for_change(&mut self, previous: u16, timeout: Duration, subnode: u8) -> Result<u16> {
        let start = Instant::now();
        loop {
            let sw = self.status_word(subnode)?;
            if sw != previous {
                return Ok(sw);
            }
            if start.elapsed() >= timeout {
                return Err(ServoError::TimedOut {
                    operation: "wait_for_change",
                    timeout,
                });
            }
            if !self.config.poll_interval.is_zero() {
                thread::sleep(self.config.poll_interval);
            }
        }
    }

    /// Clear a drive fault with `0` then fault reset pulses on the control
    /// word, at most `fault_reset_retries` times.
    pub fn fault_reset(&mut self, subnode: u8) -> Result<()> {
        self.clear_fault(None, subnode).map(|_| ())
    }

    // Returns the last status word. With a deadline, every wait is capped by
    // the time left and expiry is reported as the caller's timeout.
    fn clear_fault(&mut self, deadline: Option<&Deadline>, subnode: u8) -> Result<u16> {
        let retries = self.config.fault_reset_retries;
        let pds_timeout = self.config.pds_timeout;
        let mut sw = self.status_word(subnode)?;
        let mut attempts = 0;
        loop {
            let state = decode_state(sw);
            if !state.is_fault() {
                return Ok(sw);
            }
            if attempts == retries {
                return Err(ServoError::StateError { state, attempts });
            }
            let timeout = match deadline {
                Some(deadline) => deadline.remaining()?.min(pds_timeout),
                None => pds_timeout,
            };
            attempts += 1;
            warn!("subnode {}: fault reset attempt {}/{} in {:?}", subnode, attempts, retries, state);

            self.command(PdsCommand::DisableVoltage, subnode)?;
            self.command(PdsCommand::FaultReset, subnode)?;
            sw = match self.wait_for_change(sw, timeout, subnode) {
                Ok(sw) => sw,
                // a pulse the drive ignored only costs one attempt
                Err(ServoError::TimedOut { .. }) => self.status_word(subnode)?,
                Err(e) => return Err(e),
            };
        }
    }

    /// Bring the drive to SwitchOnDisabled, clearing faults on the way.
    pub fn disable(&mut self, subnode: u8) -> Result<()> {
        let timeout = self.config.pds_timeout;
        let mut sw = self.status_word(subnode)?;
        loop {
            match decode_state(sw) {
                PdsState::SwitchOnDisabled => return Ok(()),
                state if state.is_fault() => {
                    self.fault_reset(subnode)?;
                    sw = self.status_word(subnode)?;
                }
                _ => {
                    self.command(PdsCommand::DisableVoltage, subnode)?;
                    sw = self.wait_for_change(sw, timeout, subnode)?;
                }
            }
        }
    }

    /// Bring the drive to Enabled (operation enabled) within `timeout`.
    pub fn enable(&mut self, timeout: Duration, subnode: u8) -> Result<()> {
        self.drive_to(PdsState::Enabled, "enable", timeout, subnode)
    }

    /// Bring the drive to SwitchedOn within `timeout`, disabling operation
    /// if it is currently enabled.
    pub fn switch_on(&mut self, timeout: Duration, subnode: u8) -> Result<()> {
        self.drive_to(PdsState::SwitchedOn, "switch_on", timeout, subnode)
    }

    fn drive_to(
        &mut self,
        target: PdsState,
        operation: &'static str,
        timeout: Duration,
        subnode: u8,
    ) -> Result<()> {
        let deadline = Deadline::new(operation, timeout);
        let mut sw = self.status_word(subnode)?;
        loop {
            let state = decode_state(sw);
            if state == target {
                return Ok(());
            }
            let remaining = deadline.remaining()?;

            let command = match state {
                PdsState::NotReady => None,
                PdsState::SwitchOnDisabled => Some(PdsCommand::Shutdown),
                PdsState::ReadyToSwitchOn => Some(PdsCommand::SwitchOn),
                PdsState::SwitchedOn => Some(PdsCommand::EnableOperation),
                PdsState::Enabled => Some(PdsCommand::DisableOperation),
                PdsState::QuickStop => Some(PdsCommand::DisableVoltage),
                PdsState::Fault | PdsState::FaultReactive => {
                    sw = self.clear_fault(Some(&deadline), subnode)?;
                    continue;
                }
            };
            if let Some(command) = command {
                self.command(command, subnode)?;
            }
            sw = match self.wait_for_change(sw, remaining, subnode) {
                Ok(sw) => sw,
                Err(ServoError::TimedOut { .. }) => return Err(deadline.expired()),
                Err(e) => return Err(e),
            };
        }
    }

    /// Operation mode the drive is actually running.
    pub fn mode(&mut self, subnode: u8) -> Result<OperationMode> {
        let value = self.read_known(MODES_OF_OPERATION_DISPLAY, subnode)?;
        value
            .as_integer()
            .and_then(|v| i8::try_from(v).ok())
            .and_then(OperationMode::from_code)
            .ok_or_else(|| ServoError::InvalidValue {
                data_type: DataType::Integer8,
                reason: format!("unknown operation mode {}", value),
            })
    }

    pub fn set_mode(&mut self, mode: OperationMode, subnode: u8) -> Result<()> {
        self.write_known(MODES_OF_OPERATION, Value::from(mode.code()), subnode)
    }
}

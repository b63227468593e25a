//! Actual values and set-points of the profile modes, homing, and the
//! target reached wait. Values are in drive units, no unit scaling is done.

use std::thread;

use crate::constant::*;
use crate::data_type::DataType;
use crate::dictionary::Dictionary;
use crate::error::{Result, ServoError};
use crate::pds_word::{ControlWord, PdsCommand, StatusWord};
use crate::prelude::*;
use crate::servo::Servo;
use crate::transport::Transport;
use crate::value::Value;
use crate::{debug, error, info};

// Operation mode specific control word bits (4 to 6).
const NEW_SET_POINT: u8 = 0b001;
const CHANGE_IMMEDIATELY: u8 = 0b010;
const RELATIVE: u8 = 0b100;
const HOMING_START: u8 = 0b001;

/// How a profile position set-point is handed to the drive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionSetpoint {
    /// Abort the running move instead of queueing behind it.
    pub immediate: bool,
    /// Target relative to the current target.
    pub relative: bool,
    pub ack_timeout: Duration,
}

impl Default for PositionSetpoint {
    fn default() -> Self {
        PositionSetpoint {
            immediate: true,
            relative: false,
            ack_timeout: SP_TIMEOUT,
        }
    }
}

impl PositionSetpoint {
    pub fn with_immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    pub fn with_relative(mut self, relative: bool) -> Self {
        self.relative = relative;
        self
    }

    pub fn with_ack_timeout(mut self, timeout: Duration) -> Self {
        self.ack_timeout = timeout;
        self
    }

    fn mode_bits(&self) -> u8 {
        let mut bits = 0;
        if self.immediate {
            bits |= CHANGE_IMMEDIATELY;
        }
        if self.relative {
            bits |= RELATIVE;
        }
        bits
    }
}

impl<T: Transport, D: Dictionary> Servo<T, D> {
    pub fn position(&mut self, subnode: u8) -> Result<i32> {
        self.read_actual(POSITION_ACTUAL, DataType::Integer32, subnode)
    }

    /// Send a profile position set-point and wait for the drive to
    /// acknowledge it.
    pub fn set_position(&mut self, target: i32, setpoint: PositionSetpoint, subnode: u8) -> Result<()> {
        self.write_known(TARGET_POSITION, Value::from(target), subnode)?;
        let bits = setpoint.mode_bits();
        let word = PdsCommand::EnableOperation.control_word();
        self.control(word.with_operation_mode_specific(bits | NEW_SET_POINT), subnode)?;
        let acked = self.wait_status("set_position", setpoint.ack_timeout, subnode, |sw| {
            sw.operation_mode_specific_12()
        });
        // the new set-point bit is released whether or not it was acknowledged
        let released = self.control(word.with_operation_mode_specific(bits), subnode);
        acked?;
        released
    }

    pub fn velocity(&mut self, subnode: u8) -> Result<i32> {
        self.read_actual(VELOCITY_ACTUAL, DataType::Integer32, subnode)
    }

    pub fn set_velocity(&mut self, target: i32, subnode: u8) -> Result<()> {
        self.write_known(TARGET_VELOCITY, Value::from(target), subnode)
    }

    pub fn torque(&mut self, subnode: u8) -> Result<i16> {
        self.read_actual(TORQUE_ACTUAL, DataType::Integer16, subnode)
    }

    pub fn set_torque(&mut self, target: i16, subnode: u8) -> Result<()> {
        self.write_known(TARGET_TORQUE, Value::from(target), subnode)
    }

    /// Poll the status word until the drive reports target reached.
    pub fn wait_reached(&mut self, timeout: Duration, subnode: u8) -> Result<()> {
        self.wait_status("wait_reached", timeout, subnode, |sw| sw.target_reached())
            .map(|_| ())
    }

    /// Start the homing method configured on the drive. The drive must be
    /// enabled in [`OperationMode::Homing`](crate::pds::OperationMode::Homing).
    pub fn homing_start(&mut self, subnode: u8) -> Result<()> {
        let word = PdsCommand::EnableOperation.control_word();
        // homing starts on a rising edge of bit 4
        self.control(word, subnode)?;
        self.control(word.with_operation_mode_specific(HOMING_START), subnode)
    }

    /// Wait until homing is attained or fails. `timeout` only bounds the
    /// wait here, the drive applies its own homing timeout.
    pub fn homing_wait(&mut self, timeout: Duration, subnode: u8) -> Result<()> {
        let sw = self.wait_status("homing_wait", timeout, subnode, |sw| {
            sw.operation_mode_specific_13() || (sw.target_reached() && sw.operation_mode_specific_12())
        })?;
        if sw.operation_mode_specific_13() {
            error!("subnode {}: homing error (status word {:#06x})", subnode, u16::from(sw));
            return Err(ServoError::HomingFailed {
                subnode,
                status_word: sw.into(),
            });
        }
        info!("subnode {}: homing attained", subnode);
        Ok(())
    }

    fn control(&mut self, word: ControlWord, subnode: u8) -> Result<()> {
        let raw = u16::from(word);
        debug!("subnode {}: control word {:#06x}", subnode, raw);
        self.write_known(CONTROL_WORD, Value::from(raw), subnode)
    }

    fn read_actual<N: TryFrom<i128>>(&mut self, name: &str, data_type: DataType, subnode: u8) -> Result<N> {
        let value = self.read_known(name, subnode)?;
        value
            .as_integer()
            .and_then(|v| N::try_from(v).ok())
            .ok_or_else(|| ServoError::InvalidValue {
                data_type,
                reason: format!("{} = {} does not fit {}", name, value, data_type),
            })
    }

    fn wait_status<F>(&mut self, operation: &'static str, timeout: Duration, subnode: u8, done: F) -> Result<StatusWord>
    where
        F: Fn(StatusWord) -> bool,
    {
        let start = Instant::now();
        loop {
            let (_, sw) = self.get_state(subnode)?;
            if done(sw) {
                return Ok(sw);
            }
            if start.elapsed() >= timeout {
                return Err(ServoError::TimedOut { operation, timeout });
            }
            if !self.config.poll_interval.is_zero() {
                thread::sleep(self.config.poll_interval);
            }
        }
    }
}

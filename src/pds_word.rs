use bitfield_struct::bitfield;

/// CiA 402 status word (0x6041).
/// The bitfield is based on a `u16`, least significant bit first.
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
pub struct StatusWord {
    pub ready_to_switch_on: bool,
    pub switched_on: bool,
    pub operation_enabled: bool,
    pub fault: bool,
    /// High voltage is applied to the power stage.
    pub voltage_enabled: bool,
    /// Active low: cleared while a quick stop is being executed.
    pub quick_stop: bool,
    pub switch_on_disabled: bool,
    pub warning: bool,
    pub manufacturer_specific_8: bool,
    /// The drive accepts control word commands from the fieldbus.
    pub remote: bool,
    pub target_reached: bool,
    pub internal_limit_active: bool,
    /// Operation mode specific (e.g. set-point acknowledge in profile position).
    pub operation_mode_specific_12: bool,
    /// Operation mode specific (e.g. following error in profile position).
    pub operation_mode_specific_13: bool,
    /// Commutation angle determination has completed.
    pub initial_angle_determined: bool,
    pub manufacturer_specific_15: bool,
}

/// CiA 402 control word (0x6040).
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
pub struct ControlWord {
    pub switch_on: bool,
    pub enable_voltage: bool,
    /// Active low: clearing it requests a quick stop.
    pub quick_stop: bool,
    pub enable_operation: bool,
    /// Operation mode specific bits 4 to 6.
    #[bits(3)]
    pub operation_mode_specific: u8,
    /// Rising edge acknowledges a fault.
    pub fault_reset: bool,
    pub halt: bool,
    pub operation_mode_specific_9: bool,
    #[bits(1)]
    _reserved_10: u8,
    #[bits(5)]
    pub manufacturer_specific: u8,
}

/// Device control commands of the CiA 402 PDS state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PdsCommand {
    Shutdown,
    SwitchOn,
    EnableOperation,
    DisableOperation,
    DisableVoltage,
    QuickStop,
    FaultReset,
}

impl PdsCommand {
    pub fn control_word(&self) -> ControlWord {
        let base = ControlWord::new();
        match self {
            PdsCommand::Shutdown => base.with_enable_voltage(true).with_quick_stop(true),
            PdsCommand::SwitchOn | PdsCommand::DisableOperation => base
                .with_switch_on(true)
                .with_enable_voltage(true)
                .with_quick_stop(true),
            PdsCommand::EnableOperation => base
                .with_switch_on(true)
                .with_enable_voltage(true)
                .with_quick_stop(true)
                .with_enable_operation(true),
            PdsCommand::DisableVoltage => base,
            PdsCommand::QuickStop => base.with_enable_voltage(true),
            PdsCommand::FaultReset => base.with_fault_reset(true),
        }
    }

    pub fn raw(&self) -> u16 {
        self.control_word().into()
    }
}

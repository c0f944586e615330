//! Unified error types for the actuator firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! command layer's error handling uniform.  All variants are `Copy` so they
//! can be passed through the service and event sink without allocation.

use core::fmt;

use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An actuator command was ignored.
    Actuator(ActuatorError),
    /// An inbound command could not be understood.
    Command(CommandError),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

/// Why an actuator command was ignored.
///
/// None of these are fatal: the controller keeps its previous state and the
/// caller may simply issue a new command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// A mutator was called before `begin()` succeeded.
    NotInitialized,
    /// LEDC timer/channel configuration failed during `begin()`.
    PwmConfigFailed,
    /// PWM duty-cycle write (or signal start/stop) failed.
    PwmWriteFailed,
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "not initialized"),
            Self::PwmConfigFailed => write!(f, "PWM configuration failed"),
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Motor action keyword was not one of `stop`, `enable`, `disable`.
    UnknownAction,
    /// A required query parameter was absent.
    MissingParameter(&'static str),
    /// A numeric parameter did not parse as an integer.
    InvalidNumber(&'static str),
    /// No command is routed at this path.
    UnknownPath,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAction => write!(f, "unknown action"),
            Self::MissingParameter(name) => write!(f, "missing parameter '{name}'"),
            Self::InvalidNumber(name) => write!(f, "parameter '{name}' is not an integer"),
            Self::UnknownPath => write!(f, "not found"),
        }
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

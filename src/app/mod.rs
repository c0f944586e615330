//! Application core: pure domain logic, zero direct I/O.
//!
//! Servo and motor controllers, their lifecycle, and the service that
//! exposes them to the command layer.  All interaction with hardware
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod lifecycle;
pub mod motor;
pub mod ports;
pub mod servo;
pub mod service;

/// Result of a clamping mutator: the value actually applied and whether
/// the request had to be constrained to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied<T> {
    pub value: T,
    pub requested: i32,
    pub clamped: bool,
}

impl<T: Copy + Into<i32>> Applied<T> {
    pub fn new(value: T, requested: i32) -> Self {
        Self {
            value,
            requested,
            clamped: value.into() != requested,
        }
    }
}

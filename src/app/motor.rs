//! DC motor speed/direction controller (TB6612FNG H-bridge).
//!
//! Signed speed in `[-max_speed, max_speed]`; the sign selects the
//! direction-pin pattern and the magnitude becomes the PWM duty.
//!
//! | speed | IN1 | IN2 | direction |
//! |-------|-----|-----|-----------|
//! | > 0   | H   | L   | forward   |
//! | < 0   | L   | H   | reverse   |
//! | 0     | L   | L   | stopped   |
//!
//! ## disable() keeps the bridge latched
//!
//! [`disable`](MotorController::disable) only drops STBY and zeroes the
//! stored speed.  Duty and direction pins keep whatever the last
//! `set_speed` wrote, so [`speed`](MotorController::speed) reads 0 while the
//! peripheral still holds the old command.  `enable()` raises STBY and
//! nothing else.

use embedded_hal::digital::{OutputPin, PinState};
use log::{debug, error, info, warn};
use serde::Serialize;

use crate::config::{MAX_MOTOR_SPEED, MotorConfig};
use crate::error::ActuatorError;

use super::Applied;
use super::lifecycle::Lifecycle;
use super::ports::PwmPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Reverse,
    Stopped,
}

impl Direction {
    pub fn from_speed(speed: i16) -> Self {
        match speed.signum() {
            1 => Self::Forward,
            -1 => Self::Reverse,
            _ => Self::Stopped,
        }
    }

    /// (IN1, IN2) levels for this direction.
    pub fn pin_states(self) -> (PinState, PinState) {
        match self {
            Self::Forward => (PinState::High, PinState::Low),
            Self::Reverse => (PinState::Low, PinState::High),
            Self::Stopped => (PinState::Low, PinState::Low),
        }
    }
}

/// Power state of the H-bridge driver chip (STBY line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Enabled,
    Standby,
}

pub struct MotorController<P, A, B, S>
where
    P: PwmPort,
    A: OutputPin,
    B: OutputPin,
    S: OutputPin,
{
    pwm: P,
    in1: A,
    in2: B,
    standby: S,
    config: MotorConfig,
    lifecycle: Lifecycle,
    driver: DriverState,
    /// Pattern last latched on IN1/IN2.
    bridge: Direction,
    speed: i16,
}

impl<P, A, B, S> MotorController<P, A, B, S>
where
    P: PwmPort,
    A: OutputPin,
    B: OutputPin,
    S: OutputPin,
{
    /// Take ownership of the PWM channel and the three bridge lines.  No
    /// hardware is touched until [`begin`](Self::begin).
    ///
    /// `max_speed` is capped at [`MAX_MOTOR_SPEED`].
    pub fn new(pwm: P, in1: A, in2: B, standby: S, mut config: MotorConfig) -> Self {
        if config.max_speed > MAX_MOTOR_SPEED {
            warn!(
                "Motor max_speed {} above {}, capping",
                config.max_speed, MAX_MOTOR_SPEED
            );
            config.max_speed = MAX_MOTOR_SPEED;
        }
        Self {
            pwm,
            in1,
            in2,
            standby,
            config,
            lifecycle: Lifecycle::Uninitialized,
            driver: DriverState::Standby,
            bridge: Direction::Stopped,
            speed: 0,
        }
    }

    /// Direction lines low, driver out of standby, PWM configured at duty 0.
    pub fn begin(&mut self) -> Result<(), ActuatorError> {
        self.lifecycle = Lifecycle::Uninitialized;
        self.speed = 0;

        self.write_direction(Direction::Stopped)?;
        self.write_standby(PinState::High)?;
        self.driver = DriverState::Enabled;

        let pwm = self.config.pwm;
        if let Err(e) = self.pwm.configure(pwm.frequency_hz, pwm.resolution_bits) {
            error!(
                "Motor: PWM config failed on GPIO {} ch{} ({:?}), driver back to standby",
                pwm.pin, pwm.channel, e
            );
            // Best effort; the config failure is what gets reported.
            let _ = self.write_standby(PinState::Low);
            self.driver = DriverState::Standby;
            return Err(ActuatorError::PwmConfigFailed);
        }
        self.write_duty(0)?;

        self.lifecycle = Lifecycle::Ready;
        info!(
            "Motor initialized (PWM GPIO {}, STBY {}, IN1 {}, IN2 {})",
            pwm.pin, self.config.standby_pin, self.config.in1_pin, self.config.in2_pin
        );
        Ok(())
    }

    /// Command a signed speed.  Inputs outside `[-max_speed, max_speed]`
    /// are clamped (and reported).  Direction pins are written before the
    /// duty.
    pub fn set_speed(&mut self, speed: i32) -> Result<Applied<i16>, ActuatorError> {
        self.lifecycle.ensure_ready("Motor", "set_speed")?;

        let max = i32::from(self.config.max_speed);
        let clamped = speed.clamp(-max, max) as i16;
        if i32::from(clamped) != speed {
            warn!(
                "Motor speed {} out of range ({}..{}), constraining to {}",
                speed, -max, max, clamped
            );
        }

        let direction = Direction::from_speed(clamped);
        let duty = self.config.speed_to_duty(clamped);
        self.drive(direction, duty)?;

        self.speed = clamped;
        debug!("Motor: speed {} -> {:?}, duty {}", clamped, direction, duty);
        Ok(Applied::new(clamped, speed))
    }

    /// Force both direction lines low and duty 0, whatever the previous
    /// command was.
    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        self.lifecycle.ensure_ready("Motor", "stop")?;
        self.drive(Direction::Stopped, 0)?;
        self.speed = 0;
        info!("Motor stopped");
        Ok(())
    }

    /// Raise STBY.  Does not re-issue the latched duty/direction.
    pub fn enable(&mut self) -> Result<(), ActuatorError> {
        self.lifecycle.ensure_ready("Motor", "enable")?;
        self.write_standby(PinState::High)?;
        self.driver = DriverState::Enabled;
        info!("Motor driver enabled");
        Ok(())
    }

    /// Drop STBY and zero the stored speed.  Duty and direction stay latched.
    pub fn disable(&mut self) -> Result<(), ActuatorError> {
        self.lifecycle.ensure_ready("Motor", "disable")?;
        self.write_standby(PinState::Low)?;
        self.driver = DriverState::Standby;
        self.speed = 0;
        info!("Motor driver disabled (standby)");
        Ok(())
    }

    /// Last commanded signed speed.  No current or back-EMF sensing.
    pub fn speed(&self) -> i16 {
        self.speed
    }

    /// Direction implied by the stored speed.
    pub fn direction(&self) -> Direction {
        Direction::from_speed(self.speed)
    }

    pub fn driver_state(&self) -> DriverState {
        self.driver
    }

    pub fn is_enabled(&self) -> bool {
        self.driver == DriverState::Enabled
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle.is_ready()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn config(&self) -> &MotorConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// Direction then duty.  If the duty write fails the previous
    /// direction pattern is restored, so a rejected command leaves the
    /// bridge as it was.
    fn drive(&mut self, direction: Direction, duty: u32) -> Result<(), ActuatorError> {
        let previous = self.bridge;
        self.write_direction(direction)?;
        if let Err(e) = self.write_duty(duty) {
            // Best effort; the duty failure is what gets reported.
            let _ = self.write_direction(previous);
            return Err(e);
        }
        Ok(())
    }

    /// Stops at the first failed line.  A failed IN2 write puts IN1 back.
    fn write_direction(&mut self, direction: Direction) -> Result<(), ActuatorError> {
        let (in1, in2) = direction.pin_states();
        if let Err(e) = self.in1.set_state(in1) {
            error!("Motor: IN1 write failed ({:?}) for {:?}", e, direction);
            return Err(ActuatorError::GpioWriteFailed);
        }
        if let Err(e) = self.in2.set_state(in2) {
            error!("Motor: IN2 write failed ({:?}) for {:?}", e, direction);
            let _ = self.in1.set_state(self.bridge.pin_states().0);
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.bridge = direction;
        Ok(())
    }

    fn write_standby(&mut self, level: PinState) -> Result<(), ActuatorError> {
        self.standby.set_state(level).map_err(|e| {
            error!("Motor: standby write failed ({:?})", e);
            ActuatorError::GpioWriteFailed
        })
    }

    fn write_duty(&mut self, duty: u32) -> Result<(), ActuatorError> {
        self.pwm.write_duty(duty).map_err(|e| {
            error!("Motor: duty write failed ({:?})", e);
            ActuatorError::PwmWriteFailed
        })
    }
}

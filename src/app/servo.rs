//! Position servo controller.
//!
//! Open-loop: the controller converts a commanded angle into a pulse width
//! and then into a duty value on its own PWM channel.  The stored angle is
//! the last *commanded* value; nothing is read back from the servo.
//!
//! ## Attach policy
//!
//! [`detach`](ServoController::detach) and
//! [`attach`](ServoController::attach) pause and resume the signal without
//! touching the stored angle.  `attach()` does not issue a fresh duty
//! write: the channel resumes at whatever duty was last latched, which
//! includes writes made by `set_position` while detached.

use embedded_hal::delay::DelayNs;
use log::{debug, error, info, warn};

use crate::config::ServoConfig;
use crate::error::ActuatorError;

use super::Applied;
use super::lifecycle::Lifecycle;
use super::ports::PwmPort;

pub struct ServoController<P: PwmPort> {
    pwm: P,
    config: ServoConfig,
    lifecycle: Lifecycle,
    angle: u8,
    attached: bool,
}

impl<P: PwmPort> ServoController<P> {
    /// Take ownership of the channel.  No hardware is touched until
    /// [`begin`](Self::begin).
    pub fn new(pwm: P, config: ServoConfig) -> Self {
        Self {
            pwm,
            angle: config.center_angle,
            config,
            lifecycle: Lifecycle::Uninitialized,
            attached: false,
        }
    }

    /// Configure the channel, command the center angle and wait for the
    /// horn to settle.
    ///
    /// On failure the controller stays (or becomes) uninitialized and every
    /// later mutator is a no-op.
    pub fn begin(&mut self, delay: &mut impl DelayNs) -> Result<(), ActuatorError> {
        self.lifecycle = Lifecycle::Uninitialized;
        self.attached = false;
        self.angle = self.config.center_angle;

        let pwm = self.config.pwm;
        if let Err(e) = self.pwm.configure(pwm.frequency_hz, pwm.resolution_bits) {
            error!(
                "Servo: PWM config failed on GPIO {} ch{} ({:?})",
                pwm.pin, pwm.channel, e
            );
            return Err(ActuatorError::PwmConfigFailed);
        }
        self.attached = true;
        delay.delay_ms(self.config.attach_delay_ms);

        let duty = self.config.angle_to_duty(self.config.center_angle);
        if let Err(e) = self.pwm.write_duty(duty) {
            error!("Servo: initial center write failed ({:?})", e);
            return Err(ActuatorError::PwmWriteFailed);
        }
        delay.delay_ms(self.config.settle_ms);

        self.lifecycle = Lifecycle::Ready;
        info!(
            "Servo initialized on GPIO {} at center position ({}°)",
            pwm.pin, self.angle
        );
        Ok(())
    }

    /// Command an angle.  Inputs outside `[min_angle, max_angle]` are
    /// clamped (and reported) rather than rejected.
    pub fn set_position(&mut self, angle: i32) -> Result<Applied<u8>, ActuatorError> {
        self.lifecycle.ensure_ready("Servo", "set_position")?;

        let (min, max) = (self.config.min_angle, self.config.max_angle);
        let clamped = angle.clamp(i32::from(min), i32::from(max)) as u8;
        if i32::from(clamped) != angle {
            warn!(
                "Servo angle {}° out of range ({}-{}°), constraining to {}°",
                angle, min, max, clamped
            );
        }

        let us = self.config.angle_to_us(clamped);
        let duty = self.config.pwm.us_to_duty(us);
        if let Err(e) = self.pwm.write_duty(duty) {
            error!("Servo: duty write failed ({:?}), angle unchanged", e);
            return Err(ActuatorError::PwmWriteFailed);
        }
        debug!("Servo: {}° -> {}us -> duty {}", clamped, us, duty);

        self.angle = clamped;
        info!("Servo moved to {}°", clamped);
        Ok(Applied::new(clamped, angle))
    }

    /// Equivalent to `set_position(center_angle)`.
    pub fn center(&mut self) -> Result<Applied<u8>, ActuatorError> {
        self.set_position(i32::from(self.config.center_angle))
    }

    /// Stop the signal.  The stored angle is kept.
    pub fn detach(&mut self) -> Result<(), ActuatorError> {
        self.lifecycle.ensure_ready("Servo", "detach")?;
        if !self.attached {
            return Ok(());
        }
        if let Err(e) = self.pwm.detach() {
            error!("Servo: detach failed ({:?})", e);
            return Err(ActuatorError::PwmWriteFailed);
        }
        self.attached = false;
        info!("Servo detached from GPIO {}", self.config.pwm.pin);
        Ok(())
    }

    /// Resume the signal at the last latched duty.
    pub fn attach(&mut self) -> Result<(), ActuatorError> {
        self.lifecycle.ensure_ready("Servo", "attach")?;
        if self.attached {
            return Ok(());
        }
        if let Err(e) = self.pwm.attach() {
            error!("Servo: attach failed ({:?})", e);
            return Err(ActuatorError::PwmWriteFailed);
        }
        self.attached = true;
        info!("Servo re-attached to GPIO {}", self.config.pwm.pin);
        Ok(())
    }

    /// Last commanded angle.  Never queries hardware.
    pub fn position(&self) -> u8 {
        self.angle
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle.is_ready()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn config(&self) -> &ServoConfig {
        &self.config
    }
}

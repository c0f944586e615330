//! System configuration parameters
//!
//! All tunable parameters for the actuator node: PWM channel setup, servo
//! pulse-width mapping, motor speed range, and the network surface.
//! Defaults reproduce the board wiring in [`crate::pins`].

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::pins;

/// Highest LEDC timer resolution supported by the ESP32.
pub const MAX_RESOLUTION_BITS: u8 = 20;

/// Largest accepted `MotorConfig::max_speed`.
pub const MAX_MOTOR_SPEED: u16 = 255;

// ───────────────────────────────────────────────────────────────
// PWM channel
// ───────────────────────────────────────────────────────────────

/// One hardware PWM output.  Frequency and resolution are fixed once the
/// channel is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PwmConfig {
    /// GPIO carrying the PWM signal
    pub pin: i32,
    /// LEDC channel number
    pub channel: u32,
    /// Carrier frequency (Hz)
    pub frequency_hz: u32,
    /// Duty resolution (bits)
    pub resolution_bits: u8,
}

impl PwmConfig {
    /// Signal period in microseconds (truncating).
    pub fn period_us(&self) -> u32 {
        1_000_000 / self.frequency_hz.max(1)
    }

    /// Largest duty value the channel accepts: `2^resolution − 1`.
    pub fn max_duty(&self) -> u32 {
        let bits = u32::from(self.resolution_bits.min(31));
        (1u32 << bits) - 1
    }

    /// Convert a high-time in microseconds to a duty value.
    ///
    /// `duty = us × max_duty / period`, truncated.  Pulses at or beyond the
    /// full period saturate at [`max_duty`](Self::max_duty).
    pub fn us_to_duty(&self, us: u32) -> u32 {
        let period = u64::from(self.period_us().max(1));
        let duty = u64::from(us) * u64::from(self.max_duty()) / period;
        duty.min(u64::from(self.max_duty())) as u32
    }
}

// ───────────────────────────────────────────────────────────────
// Servo
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServoConfig {
    pub pwm: PwmConfig,
    /// Lowest commandable angle (degrees)
    pub min_angle: u8,
    /// Highest commandable angle (degrees)
    pub max_angle: u8,
    /// Angle commanded by `begin()` and `center()`
    pub center_angle: u8,
    /// Pulse width at `min_angle` (µs)
    pub min_pulse_us: u32,
    /// Pulse width at `max_angle` (µs)
    pub max_pulse_us: u32,
    /// Wait after configuring the channel before the first write (ms)
    pub attach_delay_ms: u32,
    /// Mechanical settle time after centering in `begin()` (ms)
    pub settle_ms: u32,
}

impl ServoConfig {
    /// Linear angle → pulse-width mapping, truncating.
    ///
    /// `angle` is expected to be already clamped to
    /// `[min_angle, max_angle]`; values outside are clamped here as well.
    pub fn angle_to_us(&self, angle: u8) -> u32 {
        if self.max_angle <= self.min_angle {
            return self.min_pulse_us;
        }
        let angle = angle.clamp(self.min_angle, self.max_angle);
        let span_deg = u32::from(self.max_angle - self.min_angle);
        let span_us = self.max_pulse_us.saturating_sub(self.min_pulse_us);
        self.min_pulse_us + u32::from(angle - self.min_angle) * span_us / span_deg
    }

    /// Duty value for a given angle on this servo's channel.
    pub fn angle_to_duty(&self, angle: u8) -> u32 {
        self.pwm.us_to_duty(self.angle_to_us(angle))
    }
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            pwm: PwmConfig {
                pin: pins::SERVO_PWM_GPIO,
                channel: pins::SERVO_LEDC_CHANNEL,
                frequency_hz: pins::SERVO_PWM_FREQ_HZ,
                resolution_bits: pins::SERVO_PWM_RESOLUTION_BITS,
            },
            min_angle: 0,
            max_angle: 180,
            center_angle: 90,
            min_pulse_us: 1000,
            max_pulse_us: 2000,
            attach_delay_ms: 50,
            settle_ms: 500,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// DC motor
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorConfig {
    pub pwm: PwmConfig,
    /// H-bridge standby (enable) line
    pub standby_pin: i32,
    /// H-bridge direction line IN1
    pub in1_pin: i32,
    /// H-bridge direction line IN2
    pub in2_pin: i32,
    /// Magnitude of the signed speed range `[-max_speed, max_speed]`
    pub max_speed: u16,
}

impl MotorConfig {
    /// Duty value for a (clamped) signed speed.
    ///
    /// `|speed| × max_duty / max_speed`; with the default 8-bit channel and
    /// `max_speed = 255` the duty equals the magnitude.
    pub fn speed_to_duty(&self, speed: i16) -> u32 {
        let magnitude = u32::from(speed.unsigned_abs()).min(u32::from(self.max_speed));
        let max_speed = u32::from(self.max_speed).max(1);
        (u64::from(magnitude) * u64::from(self.pwm.max_duty()) / u64::from(max_speed)) as u32
    }
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            pwm: PwmConfig {
                pin: pins::MOTOR_PWM_GPIO,
                channel: pins::MOTOR_LEDC_CHANNEL,
                frequency_hz: pins::MOTOR_PWM_FREQ_HZ,
                resolution_bits: pins::MOTOR_PWM_RESOLUTION_BITS,
            },
            standby_pin: pins::MOTOR_STANDBY_GPIO,
            in1_pin: pins::MOTOR_IN1_GPIO,
            in2_pin: pins::MOTOR_IN2_GPIO,
            max_speed: 255,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// System
// ───────────────────────────────────────────────────────────────

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub servo: ServoConfig,
    pub motor: MotorConfig,

    // --- Network ---
    /// HTTP command/telemetry server port
    pub http_port: u16,
    /// Station association attempts before giving up
    pub wifi_connect_attempts: u32,
    /// Delay between association polls (milliseconds)
    pub wifi_retry_delay_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            servo: ServoConfig::default(),
            motor: MotorConfig::default(),
            http_port: 80,
            wifi_connect_attempts: 20,
            wifi_retry_delay_ms: 500,
        }
    }
}

impl SystemConfig {
    /// Reject impossible parameters.  Invalid ranges are never silently
    /// clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_pwm(&self.servo.pwm)?;
        validate_pwm(&self.motor.pwm)?;

        let s = &self.servo;
        if s.min_angle >= s.max_angle {
            return Err(ConfigError::ValidationFailed("servo.min_angle must be below max_angle"));
        }
        if !(s.min_angle..=s.max_angle).contains(&s.center_angle) {
            return Err(ConfigError::ValidationFailed("servo.center_angle outside angle range"));
        }
        if s.min_pulse_us >= s.max_pulse_us {
            return Err(ConfigError::ValidationFailed("servo.min_pulse_us must be below max_pulse_us"));
        }
        if s.max_pulse_us > s.pwm.period_us() {
            return Err(ConfigError::ValidationFailed("servo.max_pulse_us exceeds PWM period"));
        }

        let m = &self.motor;
        if m.max_speed == 0 || m.max_speed > MAX_MOTOR_SPEED {
            return Err(ConfigError::ValidationFailed("motor.max_speed must be 1-255"));
        }

        if self.http_port == 0 {
            return Err(ConfigError::ValidationFailed("http_port must be non-zero"));
        }
        Ok(())
    }
}

fn validate_pwm(pwm: &PwmConfig) -> Result<(), ConfigError> {
    if pwm.frequency_hz == 0 {
        return Err(ConfigError::ValidationFailed("pwm.frequency_hz must be non-zero"));
    }
    if pwm.resolution_bits == 0 || pwm.resolution_bits > MAX_RESOLUTION_BITS {
        return Err(ConfigError::ValidationFailed("pwm.resolution_bits must be 1-20"));
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Error type
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

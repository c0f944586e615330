//! GPIO / peripheral pin assignments for the actuator node board.
//!
//! Single source of truth: [`crate::config`] builds its defaults from these
//! constants rather than hard-coding pin numbers.  Change a pin here and it
//! propagates everywhere.

// ---------------------------------------------------------------------------
// Position servo
// ---------------------------------------------------------------------------

/// LEDC PWM output driving the servo signal line.
pub const SERVO_PWM_GPIO: i32 = 25;
/// LEDC channel owned by the servo controller.
pub const SERVO_LEDC_CHANNEL: u32 = 0;

// ---------------------------------------------------------------------------
// DC motor (TB6612FNG H-bridge, channel A)
// ---------------------------------------------------------------------------

/// LEDC PWM output driving PWMA (speed magnitude).
pub const MOTOR_PWM_GPIO: i32 = 32;
/// Digital output: STBY, HIGH = driver powered, LOW = standby.
pub const MOTOR_STANDBY_GPIO: i32 = 33;
/// Digital output: AIN1.
pub const MOTOR_IN1_GPIO: i32 = 27;
/// Digital output: AIN2.
pub const MOTOR_IN2_GPIO: i32 = 26;
/// LEDC channel owned by the motor controller.
///
/// Channel 8 is the first low-speed channel on the classic ESP32, which
/// puts it on a different timer group from the servo.
pub const MOTOR_LEDC_CHANNEL: u32 = 8;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// Servo frame rate (20 ms period).
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// Servo timer resolution.  16-bit gives ~0.3 µs per duty step at 50 Hz.
pub const SERVO_PWM_RESOLUTION_BITS: u8 = 16;
/// Motor PWM carrier frequency.
pub const MOTOR_PWM_FREQ_HZ: u32 = 1_000;
/// Motor timer resolution.  8-bit gives 0 – 255 duty levels, one per speed step.
pub const MOTOR_PWM_RESOLUTION_BITS: u8 = 8;

//! Actuator service: the hexagonal core.
//!
//! [`ActuatorService`] owns both controllers and exposes one
//! hardware-agnostic API to the command layer and the telemetry layer.
//!
//! ```text
//!  Command layer ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                    │      ActuatorService      │
//!  Telemetry     ◀── │  Mutex<Servo> Mutex<Motor>│ ──▶ PwmPort / OutputPin
//!                    └──────────────────────────┘
//! ```
//!
//! HTTP handlers run on the server task, so each controller sits behind
//! its own mutex.  A mutator holds the lock across the stored-state update
//! *and* its hardware writes, which keeps direction-then-duty sequences of
//! concurrent motor commands from interleaving.

use std::sync::{Mutex, MutexGuard, PoisonError};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::config::SystemConfig;
use crate::error::{Error, Result};

use super::commands::{ActuatorCommand, MotorAction};
use super::events::{
    ActuatorStatus, AppEvent, CommandReply, InitReport, MotorStatus, ServoStatus,
};
use super::motor::MotorController;
use super::ports::{EventSink, PwmPort};
use super::servo::ServoController;

/// A poisoned lock only means another handler panicked mid-call; the
/// controller fields are always written after the hardware, so the data
/// is still coherent.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ActuatorService<SP, MP, A, B, S>
where
    SP: PwmPort,
    MP: PwmPort,
    A: OutputPin,
    B: OutputPin,
    S: OutputPin,
{
    servo: Mutex<ServoController<SP>>,
    motor: Mutex<MotorController<MP, A, B, S>>,
}

impl<SP, MP, A, B, S> ActuatorService<SP, MP, A, B, S>
where
    SP: PwmPort,
    MP: PwmPort,
    A: OutputPin,
    B: OutputPin,
    S: OutputPin,
{
    /// Build both controllers from `config`.  An invalid config is logged
    /// and replaced by the defaults.
    pub fn new(
        servo_pwm: SP,
        motor_pwm: MP,
        in1: A,
        in2: B,
        standby: S,
        config: &SystemConfig,
    ) -> Self {
        let config = match config.validate() {
            Ok(()) => config.clone(),
            Err(e) => {
                warn!("Actuator config rejected ({}), running with defaults", e);
                SystemConfig::default()
            }
        };
        Self::from_controllers(
            ServoController::new(servo_pwm, config.servo),
            MotorController::new(motor_pwm, in1, in2, standby, config.motor),
        )
    }

    /// Like [`new`](Self::new), but an invalid config is an error instead of
    /// a fallback.
    pub fn try_new(
        servo_pwm: SP,
        motor_pwm: MP,
        in1: A,
        in2: B,
        standby: S,
        config: &SystemConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_controllers(
            ServoController::new(servo_pwm, config.servo),
            MotorController::new(motor_pwm, in1, in2, standby, config.motor),
        ))
    }

    pub fn from_controllers(
        servo: ServoController<SP>,
        motor: MotorController<MP, A, B, S>,
    ) -> Self {
        Self {
            servo: Mutex::new(servo),
            motor: Mutex::new(motor),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Initialise both controllers independently.  A servo failure does
    /// not keep the motor from coming up, and vice versa.
    pub fn begin(&self, delay: &mut impl DelayNs, sink: &mut impl EventSink) -> InitReport {
        let report = InitReport {
            servo: lock(&self.servo).begin(delay),
            motor: lock(&self.motor).begin(),
        };
        if report.all_ok() {
            info!("Actuators ready");
        } else {
            warn!(
                "Actuator init incomplete (servo={:?}, motor={:?})",
                report.servo, report.motor
            );
        }
        sink.emit(&AppEvent::Started(report));
        report
    }

    // ── Command handling ──────────────────────────────────────

    /// Dispatch one command.  On error the command was ignored and the
    /// event sink receives [`AppEvent::Rejected`].
    pub fn handle(&self, cmd: ActuatorCommand, sink: &mut impl EventSink) -> Result<CommandReply> {
        let result = self.dispatch(cmd);
        match &result {
            Ok(event) => sink.emit(event),
            Err(e) => sink.emit(&AppEvent::Rejected(*e)),
        }
        result.map(|event| reply_for(&event))
    }

    /// [`handle`](Self::handle) for a raw request; parse errors are
    /// reported the same way as controller errors.
    pub fn handle_request(
        &self,
        path: &str,
        query: &str,
        sink: &mut impl EventSink,
    ) -> Result<CommandReply> {
        match ActuatorCommand::from_request(path, query) {
            Ok(cmd) => self.handle(cmd, sink),
            Err(e) => {
                let err = Error::from(e);
                sink.emit(&AppEvent::Rejected(err));
                Err(err)
            }
        }
    }

    fn dispatch(&self, cmd: ActuatorCommand) -> Result<AppEvent> {
        let event = match cmd {
            ActuatorCommand::SetAngle(angle) => {
                let applied = lock(&self.servo).set_position(angle)?;
                AppEvent::ServoMoved {
                    requested: applied.requested,
                    angle: applied.value,
                    clamped: applied.clamped,
                }
            }
            ActuatorCommand::CenterServo => {
                let applied = lock(&self.servo).center()?;
                AppEvent::ServoMoved {
                    requested: applied.requested,
                    angle: applied.value,
                    clamped: applied.clamped,
                }
            }
            ActuatorCommand::AttachServo => {
                lock(&self.servo).attach()?;
                AppEvent::ServoAttached(true)
            }
            ActuatorCommand::DetachServo => {
                lock(&self.servo).detach()?;
                AppEvent::ServoAttached(false)
            }
            ActuatorCommand::SetSpeed(speed) => {
                let applied = lock(&self.motor).set_speed(speed)?;
                AppEvent::MotorSpeed {
                    requested: applied.requested,
                    speed: applied.value,
                    clamped: applied.clamped,
                }
            }
            ActuatorCommand::Motor(action) => {
                let mut motor = lock(&self.motor);
                match action {
                    MotorAction::Stop => motor.stop()?,
                    MotorAction::Enable => motor.enable()?,
                    MotorAction::Disable => motor.disable()?,
                }
                AppEvent::MotorAction(action)
            }
        };
        Ok(event)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Last commanded servo angle.
    pub fn position(&self) -> u8 {
        lock(&self.servo).position()
    }

    /// Last commanded motor speed.
    pub fn speed(&self) -> i16 {
        lock(&self.motor).speed()
    }

    /// Status payload for telemetry.  Read-only.
    pub fn status(&self) -> ActuatorStatus {
        let servo = {
            let s = lock(&self.servo);
            ServoStatus {
                angle: s.position(),
                ready: s.is_ready(),
                attached: s.is_attached(),
            }
        };
        let motor = {
            let m = lock(&self.motor);
            MotorStatus {
                speed: m.speed(),
                direction: m.direction(),
                enabled: m.is_enabled(),
                ready: m.is_ready(),
            }
        };
        ActuatorStatus { servo, motor }
    }

    /// Run `f` with exclusive access to the servo controller.
    pub fn with_servo<R>(&self, f: impl FnOnce(&mut ServoController<SP>) -> R) -> R {
        f(&mut lock(&self.servo))
    }

    /// Run `f` with exclusive access to the motor controller.
    pub fn with_motor<R>(&self, f: impl FnOnce(&mut MotorController<MP, A, B, S>) -> R) -> R {
        f(&mut lock(&self.motor))
    }
}

fn reply_for(event: &AppEvent) -> CommandReply {
    match *event {
        AppEvent::ServoMoved { angle, clamped, .. } => CommandReply::angle(angle, clamped),
        AppEvent::ServoAttached(true) => CommandReply::action("attach"),
        AppEvent::ServoAttached(false) => CommandReply::action("detach"),
        AppEvent::MotorSpeed { speed, clamped, .. } => CommandReply::speed(speed, clamped),
        AppEvent::MotorAction(action) => CommandReply::action(action.as_str()),
        AppEvent::Started(_) | AppEvent::Rejected(_) | AppEvent::Status(_) => {
            CommandReply::action("none")
        }
    }
}

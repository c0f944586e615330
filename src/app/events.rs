//! Outbound application events and read-side payloads.
//!
//! The [`ActuatorService`](super::service::ActuatorService) emits
//! [`AppEvent`]s through the [`EventSink`](super::ports::EventSink) port.
//! [`ActuatorStatus`] and [`CommandReply`] are what the HTTP layer
//! serialises back to clients.

use serde::Serialize;

use crate::error::{Error, ActuatorError};

use super::commands::MotorAction;
use super::motor::Direction;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// `begin()` finished for both controllers.
    Started(InitReport),

    /// The servo accepted an angle command.
    ServoMoved { requested: i32, angle: u8, clamped: bool },

    /// The servo signal was paused (`false`) or resumed (`true`).
    ServoAttached(bool),

    /// The motor accepted a speed command.
    MotorSpeed { requested: i32, speed: i16, clamped: bool },

    /// A motor keyword action was applied.
    MotorAction(MotorAction),

    /// A command was ignored; state is unchanged.
    Rejected(Error),

    /// Point-in-time status snapshot.
    Status(ActuatorStatus),
}

/// Per-device outcome of [`ActuatorService::begin`](super::service::ActuatorService::begin).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitReport {
    pub servo: Result<(), ActuatorError>,
    pub motor: Result<(), ActuatorError>,
}

impl InitReport {
    pub fn all_ok(&self) -> bool {
        self.servo.is_ok() && self.motor.is_ok()
    }
}

/// Read-only actuator state for the telemetry payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActuatorStatus {
    pub servo: ServoStatus,
    pub motor: MotorStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServoStatus {
    pub angle: u8,
    pub ready: bool,
    pub attached: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MotorStatus {
    pub speed: i16,
    pub direction: Direction,
    pub enabled: bool,
    pub ready: bool,
}

/// Response body for a single command.
///
/// ```json
/// {"ok":true,"angle":180,"clamped":true}
/// {"ok":true,"speed":-255,"clamped":true}
/// {"ok":true,"action":"stop"}
/// {"ok":false,"error":"unknown action"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandReply {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'static str>,
    #[serde(skip_serializing_if = "core::ops::Not::not")]
    pub clamped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandReply {
    fn ok() -> Self {
        Self {
            ok: true,
            angle: None,
            speed: None,
            action: None,
            clamped: false,
            error: None,
        }
    }

    pub fn angle(angle: u8, clamped: bool) -> Self {
        Self { angle: Some(angle), clamped, ..Self::ok() }
    }

    pub fn speed(speed: i16, clamped: bool) -> Self {
        Self { speed: Some(speed), clamped, ..Self::ok() }
    }

    pub fn action(action: &'static str) -> Self {
        Self { action: Some(action), ..Self::ok() }
    }

    pub fn error(err: &Error) -> Self {
        let message = match err {
            Error::Command(e) => e.to_string(),
            Error::Actuator(e) => e.to_string(),
            other => other.to_string(),
        };
        Self { ok: false, error: Some(message), ..Self::ok() }
    }
}

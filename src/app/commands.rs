//! Inbound commands to the actuator service.
//!
//! These represent actions requested by the outside world (HTTP handlers,
//! serial console) that the [`ActuatorService`](super::service::ActuatorService)
//! dispatches to the controllers.  Parsing is kept here, free of any
//! server types, so the request grammar is host-testable.

use core::str::FromStr;

use crate::error::CommandError;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCommand {
    /// Move the servo to an angle (clamped by the controller).
    SetAngle(i32),
    CenterServo,
    AttachServo,
    DetachServo,
    /// Drive the motor at a signed speed (clamped by the controller).
    SetSpeed(i32),
    /// Keyword action on the motor driver.
    Motor(MotorAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorAction {
    Stop,
    Enable,
    Disable,
}

impl MotorAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Enable => "enable",
            Self::Disable => "disable",
        }
    }
}

impl FromStr for MotorAction {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("stop") {
            Ok(Self::Stop)
        } else if s.eq_ignore_ascii_case("enable") {
            Ok(Self::Enable)
        } else if s.eq_ignore_ascii_case("disable") {
            Ok(Self::Disable)
        } else {
            Err(CommandError::UnknownAction)
        }
    }
}

impl ActuatorCommand {
    /// Route an HTTP-style request to a command.
    ///
    /// | path            | query                  |
    /// |-----------------|------------------------|
    /// | `/servo`        | `angle=<int>`          |
    /// | `/servo/center` |                        |
    /// | `/servo/attach` |                        |
    /// | `/servo/detach` |                        |
    /// | `/motor`        | `speed=<int>`          |
    /// | `/motor`        | `action=stop\|enable\|disable` |
    pub fn from_request(path: &str, query: &str) -> Result<Self, CommandError> {
        match path.trim_end_matches('/') {
            "/servo" => {
                let raw = query_param(query, "angle").ok_or(CommandError::MissingParameter("angle"))?;
                Ok(Self::SetAngle(parse_int(raw, "angle")?))
            }
            "/servo/center" => Ok(Self::CenterServo),
            "/servo/attach" => Ok(Self::AttachServo),
            "/servo/detach" => Ok(Self::DetachServo),
            "/motor" => {
                if let Some(raw) = query_param(query, "speed") {
                    Ok(Self::SetSpeed(parse_int(raw, "speed")?))
                } else if let Some(raw) = query_param(query, "action") {
                    Ok(Self::Motor(raw.parse()?))
                } else {
                    Err(CommandError::MissingParameter("speed"))
                }
            }
            _ => Err(CommandError::UnknownPath),
        }
    }
}

/// Split a request URI into `(path, query)`.
pub fn split_uri(uri: &str) -> (&str, &str) {
    match uri.split_once('?') {
        Some((path, query)) => (path, query),
        None => (uri, ""),
    }
}

/// Value of the first `key=value` pair in a raw query string.
///
/// No percent-decoding; actuator parameters are plain integers and
/// keywords.
pub fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

/// Parse any `i32`.  Range limits are the controller's concern, not the
/// parser's.
pub fn parse_int(raw: &str, name: &'static str) -> Result<i32, CommandError> {
    raw.trim().parse::<i32>().map_err(|_| CommandError::InvalidNumber(name))
}

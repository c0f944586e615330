//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// Render an event as a single tagged log line.
pub fn format_event(event: &AppEvent) -> String {
    match event {
        AppEvent::Started(report) => format!(
            "START | servo={} motor={}",
            if report.servo.is_ok() { "OK" } else { "FAIL" },
            if report.motor.is_ok() { "OK" } else { "FAIL" },
        ),
        AppEvent::ServoMoved { requested, angle, clamped } => {
            if *clamped {
                format!("SERVO | angle={}\u{00b0} (requested {}, clamped)", angle, requested)
            } else {
                format!("SERVO | angle={}\u{00b0}", angle)
            }
        }
        AppEvent::ServoAttached(attached) => {
            format!("SERVO | {}", if *attached { "attached" } else { "detached" })
        }
        AppEvent::MotorSpeed { requested, speed, clamped } => {
            if *clamped {
                format!("MOTOR | speed={} (requested {}, clamped)", speed, requested)
            } else {
                format!("MOTOR | speed={}", speed)
            }
        }
        AppEvent::MotorAction(action) => format!("MOTOR | action={}", action.as_str()),
        AppEvent::Rejected(err) => format!("REJECT | {}", err),
        AppEvent::Status(s) => format!(
            "STATUS | servo={}\u{00b0} ready={} attached={} | motor={} {:?} enabled={} ready={}",
            s.servo.angle,
            s.servo.ready,
            s.servo.attached,
            s.motor.speed,
            s.motor.direction,
            s.motor.enabled,
            s.motor.ready,
        ),
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        let line = format_event(event);
        match event {
            AppEvent::Rejected(_) => warn!("{}", line),
            AppEvent::Started(report) if !report.all_ok() => warn!("{}", line),
            _ => info!("{}", line),
        }
    }
}

//! Actuator node firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HTTP server        LogEventSink        WiFi STA               │
//! │  (commands/status)  (EventSink)         (transport)            │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          ActuatorService (pure logic)                  │    │
//! │  │  ServoController · MotorController                     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  LedcPwm × 2 · GpioOutput × 3 (drivers)                        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::{error, info, warn};

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use actuator_node::adapters::http;
use actuator_node::adapters::log_sink::LogEventSink;
use actuator_node::adapters::wifi::{self, WifiCredentials};
use actuator_node::app::events::AppEvent;
use actuator_node::app::ports::EventSink;
use actuator_node::app::service::ActuatorService;
use actuator_node::config::SystemConfig;
use actuator_node::drivers::gpio::GpioOutput;
use actuator_node::drivers::ledc::LedcPwm;

/// LEDC timers: the servo and motor run at different frequencies, so each
/// channel gets its own.
const SERVO_LEDC_TIMER: u32 = 0;
const MOTOR_LEDC_TIMER: u32 = 1;

/// Interval between periodic status lines on the console.
const STATUS_INTERVAL: Duration = Duration::from_secs(10);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Actuator node v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();

    // ── 3. Peripherals ────────────────────────────────────────
    let servo_pwm = LedcPwm::new(config.servo.pwm.pin, config.servo.pwm.channel, SERVO_LEDC_TIMER);
    let motor_pwm = LedcPwm::new(config.motor.pwm.pin, config.motor.pwm.channel, MOTOR_LEDC_TIMER);
    let in1 = GpioOutput::new(config.motor.in1_pin)?;
    let in2 = GpioOutput::new(config.motor.in2_pin)?;
    let standby = GpioOutput::new(config.motor.standby_pin)?;

    // ── 4. Actuators ──────────────────────────────────────────
    let service = Arc::new(ActuatorService::try_new(
        servo_pwm, motor_pwm, in1, in2, standby, &config,
    )?);
    let mut sink = LogEventSink::new();
    let report = service.begin(&mut FreeRtos, &mut sink);
    if !report.all_ok() {
        error!("One or more actuators failed to initialise; their commands will be ignored");
    }

    // ── 5. Network ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let mut wifi_driver = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
        sysloop,
    )?;

    let _server = match WifiCredentials::from_build_env() {
        Ok(creds) => match wifi::connect(
            &mut wifi_driver,
            &creds,
            config.wifi_connect_attempts,
            config.wifi_retry_delay_ms,
        ) {
            Ok(()) => Some(http::start(Arc::clone(&service), config.http_port)?),
            Err(e) => {
                error!("WiFi unavailable ({}); running without the HTTP command layer", e);
                None
            }
        },
        Err(e) => {
            warn!("No usable WiFi credentials ({}); set WIFI_SSID/WIFI_PASSWORD at build time", e);
            None
        }
    };

    // ── 6. Idle loop ──────────────────────────────────────────
    info!("System ready.");
    loop {
        std::thread::sleep(STATUS_INTERVAL);
        sink.emit(&AppEvent::Status(service.status()));
    }
}

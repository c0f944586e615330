//! Fuzz target: `adapters::http::route`
//!
//! Pushes arbitrary URIs through the full service with no-op hardware and
//! asserts every response is well-formed and the stored state stays inside
//! the actuator ranges.
//!
//! cargo fuzz run fuzz_http_route

#![no_main]

use std::convert::Infallible;

use actuator_node::adapters::http::route;
use actuator_node::app::events::AppEvent;
use actuator_node::app::ports::{EventSink, PwmPort};
use actuator_node::app::service::ActuatorService;
use actuator_node::config::SystemConfig;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use libfuzzer_sys::fuzz_target;

struct NullPwm;

impl PwmPort for NullPwm {
    type Error = Infallible;
    fn configure(&mut self, _: u32, _: u8) -> Result<(), Infallible> {
        Ok(())
    }
    fn write_duty(&mut self, _: u32) -> Result<(), Infallible> {
        Ok(())
    }
    fn detach(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn attach(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

struct NullPin;

impl ErrorType for NullPin {
    type Error = Infallible;
}

impl OutputPin for NullPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _: u32) {}
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(uri) = core::str::from_utf8(data) else {
        return;
    };
    let service = ActuatorService::new(
        NullPwm,
        NullPwm,
        NullPin,
        NullPin,
        NullPin,
        &SystemConfig::default(),
    );
    service.begin(&mut NoDelay, &mut NullSink);

    let resp = route(&service, uri, &mut NullSink);
    assert!(matches!(resp.status, 200 | 400 | 404 | 500 | 503));
    assert!(!resp.body.is_empty());

    assert!(service.position() <= 180);
    assert!((-255..=255).contains(&service.speed()));
});

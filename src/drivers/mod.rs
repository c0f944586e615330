//! Peripheral drivers implementing the hardware ports.
//!
//! | Driver       | Implements                         | Peripheral        |
//! |--------------|------------------------------------|-------------------|
//! | `ledc`       | [`PwmPort`](crate::app::ports::PwmPort) | LEDC timer + channel |
//! | `gpio`       | `embedded_hal::digital::OutputPin` | GPIO output       |
//!
//! ## Dual-target design
//!
//! On ESP-IDF: raw `esp_idf_svc::sys` calls.
//! On host/test: tracks state in-memory only.

pub mod gpio;
pub mod ledc;

/// Raw ESP-IDF error code from a failed peripheral call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwError {
    LedcTimerConfig(i32),
    LedcChannelConfig(i32),
    LedcWrite(i32),
    GpioConfig(i32),
    GpioWrite(i32),
}

impl core::fmt::Display for HwError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::LedcTimerConfig(rc) => write!(f, "LEDC timer config failed (rc={})", rc),
            Self::LedcChannelConfig(rc) => write!(f, "LEDC channel config failed (rc={})", rc),
            Self::LedcWrite(rc) => write!(f, "LEDC duty update failed (rc={})", rc),
            Self::GpioConfig(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::GpioWrite(rc) => write!(f, "GPIO write failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwError {}

impl embedded_hal::digital::Error for HwError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// Map an `esp_err_t` to `Ok` or the given error variant.
#[cfg(target_os = "espidf")]
pub(crate) fn check(ret: i32, err: fn(i32) -> HwError) -> Result<(), HwError> {
    if ret == esp_idf_svc::sys::ESP_OK as i32 {
        Ok(())
    } else {
        Err(err(ret))
    }
}

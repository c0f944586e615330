//! Push-pull GPIO output line (H-bridge direction and standby pins).

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use embedded_hal::digital::{ErrorType, OutputPin};

use super::HwError;

pub struct GpioOutput {
    pin: i32,
    high: bool,
}

impl GpioOutput {
    /// Configure `pin` as an output, driven low.
    #[cfg(target_os = "espidf")]
    pub fn new(pin: i32) -> Result<Self, HwError> {
        // SAFETY: called once per pin from main() during bring-up; the
        // returned handle is the pin's only owner.
        unsafe {
            super::check(gpio_reset_pin(pin), HwError::GpioConfig)?;
            super::check(
                gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT),
                HwError::GpioConfig,
            )?;
            super::check(gpio_set_level(pin, 0), HwError::GpioWrite)?;
        }
        Ok(Self { pin, high: false })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(pin: i32) -> Result<Self, HwError> {
        log::info!("gpio(sim): GPIO {} as output", pin);
        Ok(Self { pin, high: false })
    }

    pub fn pin(&self) -> i32 {
        self.pin
    }

    /// Last level written.
    pub fn is_high(&self) -> bool {
        self.high
    }

    #[cfg(target_os = "espidf")]
    fn platform_write(&mut self, high: bool) -> Result<(), HwError> {
        // SAFETY: pin configured as output in new(); exclusively owned.
        super::check(unsafe { gpio_set_level(self.pin, u32::from(high)) }, HwError::GpioWrite)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_write(&mut self, _high: bool) -> Result<(), HwError> {
        Ok(())
    }
}

impl ErrorType for GpioOutput {
    type Error = HwError;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), HwError> {
        self.platform_write(false)?;
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), HwError> {
        self.platform_write(true)?;
        self.high = true;
        Ok(())
    }
}

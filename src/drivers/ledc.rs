//! LEDC PWM channel driver.
//!
//! Each [`LedcPwm`] owns one LEDC channel and the timer that clocks it.
//! Channels 0–7 live in the high-speed group, 8–15 in the low-speed group
//! (classic ESP32 numbering, as used by the board wiring in
//! [`pins`](crate::pins)).
//!
//! `detach()` stops the channel with the output idling low; `attach()`
//! re-latches the last written duty and restarts it.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::{debug, info};

use crate::app::ports::PwmPort;

use super::HwError;

pub struct LedcPwm {
    gpio: i32,
    channel: u32,
    timer: u32,
    last_duty: u32,
    running: bool,
}

impl LedcPwm {
    /// Bind a channel/timer pair to a GPIO.  Nothing is configured until
    /// [`PwmPort::configure`].
    pub fn new(gpio: i32, channel: u32, timer: u32) -> Self {
        Self {
            gpio,
            channel,
            timer,
            last_duty: 0,
            running: false,
        }
    }

    pub fn last_duty(&self) -> u32 {
        self.last_duty
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(target_os = "espidf")]
    fn mode(&self) -> ledc_mode_t {
        if self.channel < 8 {
            ledc_mode_t_LEDC_HIGH_SPEED_MODE
        } else {
            ledc_mode_t_LEDC_LOW_SPEED_MODE
        }
    }

    #[cfg(target_os = "espidf")]
    fn hw_channel(&self) -> ledc_channel_t {
        self.channel % 8
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_configure(&mut self, frequency_hz: u32, resolution_bits: u8) -> Result<(), HwError> {
        let timer = ledc_timer_config_t {
            speed_mode: self.mode(),
            timer_num: self.timer,
            duty_resolution: ledc_timer_bit_t::from(resolution_bits),
            freq_hz: frequency_hz,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        // SAFETY: config structs outlive the calls; this channel/timer pair
        // is owned exclusively by `self`.
        super::check(unsafe { ledc_timer_config(&timer) }, HwError::LedcTimerConfig)?;

        let channel = ledc_channel_config_t {
            gpio_num: self.gpio,
            speed_mode: self.mode(),
            channel: self.hw_channel(),
            timer_sel: self.timer,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        super::check(unsafe { ledc_channel_config(&channel) }, HwError::LedcChannelConfig)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_configure(&mut self, _frequency_hz: u32, _resolution_bits: u8) -> Result<(), HwError> {
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_set_duty(&mut self, duty: u32) -> Result<(), HwError> {
        // SAFETY: channel configured in platform_configure(); only the
        // owning controller writes it.
        unsafe {
            super::check(ledc_set_duty(self.mode(), self.hw_channel(), duty), HwError::LedcWrite)?;
            super::check(ledc_update_duty(self.mode(), self.hw_channel()), HwError::LedcWrite)
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_set_duty(&mut self, _duty: u32) -> Result<(), HwError> {
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_stop(&mut self) -> Result<(), HwError> {
        // SAFETY: see platform_set_duty().
        super::check(unsafe { ledc_stop(self.mode(), self.hw_channel(), 0) }, HwError::LedcWrite)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_stop(&mut self) -> Result<(), HwError> {
        Ok(())
    }
}

impl PwmPort for LedcPwm {
    type Error = HwError;

    fn configure(&mut self, frequency_hz: u32, resolution_bits: u8) -> Result<(), HwError> {
        self.platform_configure(frequency_hz, resolution_bits)?;
        self.last_duty = 0;
        self.running = true;
        info!(
            "LEDC ch{} (timer {}) on GPIO {}: {} Hz, {}-bit",
            self.channel, self.timer, self.gpio, frequency_hz, resolution_bits
        );
        Ok(())
    }

    fn write_duty(&mut self, duty: u32) -> Result<(), HwError> {
        if self.running {
            self.platform_set_duty(duty)?;
        } else {
            // A stopped channel only latches; attach() pushes it out.
            debug!("LEDC ch{}: duty {} latched while stopped", self.channel, duty);
        }
        self.last_duty = duty;
        Ok(())
    }

    fn detach(&mut self) -> Result<(), HwError> {
        self.platform_stop()?;
        self.running = false;
        Ok(())
    }

    fn attach(&mut self) -> Result<(), HwError> {
        self.platform_set_duty(self.last_duty)?;
        self.running = true;
        Ok(())
    }
}

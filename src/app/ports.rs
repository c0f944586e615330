//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Command layer ──▶ ActuatorService ──▶ Controllers ──▶ Port trait ──▶ Driver
//! ```
//!
//! The controllers consume hardware through these traits via generics, so
//! the domain core never touches LEDC or GPIO registers directly.  On the
//! device the [`drivers`](crate::drivers) module implements them; tests use
//! recording mocks.
//!
//! Digital output lines are [`embedded_hal::digital::OutputPin`] and the
//! settle delay is [`embedded_hal::delay::DelayNs`]; only PWM needs a
//! bespoke port because the embedded-hal PWM trait has no notion of
//! reconfiguring the timer or pausing the signal.

// ───────────────────────────────────────────────────────────────
// PWM port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// One exclusively-owned hardware PWM output.
///
/// An implementation is bound to a single pin/channel pair at construction.
pub trait PwmPort {
    type Error: core::fmt::Debug;

    /// Configure the timer and channel.  Called from `begin()`; frequency
    /// and resolution are fixed afterwards.
    fn configure(&mut self, frequency_hz: u32, resolution_bits: u8) -> Result<(), Self::Error>;

    /// Latch a new duty value in `[0, 2^resolution − 1]`.
    fn write_duty(&mut self, duty: u32) -> Result<(), Self::Error>;

    /// Stop signal generation.  The output idles low; the duty register is
    /// kept.
    fn detach(&mut self) -> Result<(), Self::Error>;

    /// Resume signal generation at the last written duty value.
    fn attach(&mut self) -> Result<(), Self::Error>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, HTTP
/// status cache, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

//! Controller lifecycle.
//!
//! ```text
//!   Uninitialized ──begin() ok──▶ Ready ──┐
//!        ▲    │                     ▲     │ begin() again
//!        └────┘ begin() failed      └─────┘
//! ```
//!
//! There is no terminal state.  Every mutator goes through
//! [`Lifecycle::ensure_ready`] first, so the "no-op before `begin()`" rule
//! lives in one place.

use log::error;

use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Ready,
}

impl Lifecycle {
    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }

    /// Gate a mutator.  Logs and returns [`ActuatorError::NotInitialized`]
    /// while uninitialized; the caller must then perform no hardware write.
    pub fn ensure_ready(self, device: &str, op: &str) -> Result<(), ActuatorError> {
        match self {
            Self::Ready => Ok(()),
            Self::Uninitialized => {
                error!("{}: {} ignored, not initialized", device, op);
                Err(ActuatorError::NotInitialized)
            }
        }
    }
}

//! "Web size" stepper for the similar-artists limit.
//!
//! The limit belongs to the parent. The stepper keeps no copy: every gesture takes the parent's
//! current value as an argument and emits the requested new value as
//! [`AppEvent::SimilarArtistsLimitChanged`]. Nothing is clamped here; bounds are the parent's
//! call.
//!
//! Because there is no local accumulator, two gestures compose only if the parent commits the
//! first intent before the second gesture reads `current`. The parent must apply each emitted
//! value before handling the next gesture.

use thiserror::Error;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeInputError {
    #[error("`{input}` is not a whole number")]
    NotANumber { input: String },
}

pub struct SizeStepper {
    app_event_tx: AppEventSender,
}

impl SizeStepper {
    pub fn new(app_event_tx: AppEventSender) -> Self {
        Self { app_event_tx }
    }

    /// Emit `current + 1`. Returns the emitted value.
    pub fn increment(&self, current: i64) -> Option<i64> {
        self.emit_checked(current.checked_add(1), current, "increment")
    }

    /// Emit `current - 1`. Returns the emitted value.
    pub fn decrement(&self, current: i64) -> Option<i64> {
        self.emit_checked(current.checked_sub(1), current, "decrement")
    }

    pub fn set_direct(&self, value: i64) {
        self.emit(value);
    }

    /// Parse text typed into the number field and emit it.
    pub fn set_direct_input(&self, input: &str) -> Result<i64, SizeInputError> {
        let value = input
            .trim()
            .parse::<i64>()
            .map_err(|_| SizeInputError::NotANumber {
                input: input.to_string(),
            })?;
        self.emit(value);
        Ok(value)
    }

    fn emit_checked(&self, next: Option<i64>, current: i64, gesture: &str) -> Option<i64> {
        let Some(next) = next else {
            tracing::warn!(current, gesture, "similar-artists limit out of range");
            return None;
        };
        self.emit(next);
        Some(next)
    }

    fn emit(&self, value: i64) {
        self.app_event_tx
            .send(AppEvent::SimilarArtistsLimitChanged(value));
    }
}

//! Wizard step sequencing
//!
//! A fixed list of steps, each with a "next" flag. Step `n` can only be shown
//! while every step before it allows progressing; clearing a flag on a step
//! the user has already passed sends them back to it.

use thiserror::Error;

/// Outcome of a step transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// A step became the current step
    Shown(usize),
    /// The user finished the last step (the submit trigger)
    AllDone,
}

/// Why a step transition was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    /// No such step
    #[error("step {step} is out of range ({len} steps)")]
    OutOfRange {
        /// Requested step
        step: usize,
        /// Step count
        len: usize,
    },

    /// An earlier step does not allow progressing yet
    #[error("step {step} is gated by step {blocked_by}")]
    Gated {
        /// Requested step
        step: usize,
        /// First step whose "next" is disabled
        blocked_by: usize,
    },
}

/// Ordered wizard with per-step "next" gating
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSequencer {
    next_enabled: Vec<bool>,
    current: usize,
}

impl StepSequencer {
    /// Create a sequencer with `len` steps (at least one), all enabled
    pub fn new(len: usize) -> Self {
        Self {
            next_enabled: vec![true; len.max(1)],
            current: 0,
        }
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.next_enabled.len()
    }

    /// Always `false`; a sequencer has at least one step
    pub fn is_empty(&self) -> bool {
        self.next_enabled.is_empty()
    }

    /// Index of the last step
    pub fn last(&self) -> usize {
        self.len() - 1
    }

    /// Currently shown step
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Whether the user may progress past `step`
    pub fn is_next_enabled(&self, step: usize) -> bool {
        self.next_enabled.get(step).copied().unwrap_or(false)
    }

    /// Whether every step allows progressing
    pub fn all_enabled(&self) -> bool {
        self.next_enabled.iter().all(|enabled| *enabled)
    }

    /// Allow progressing past `step`
    pub fn enable(&mut self, step: usize) -> Option<StepEvent> {
        self.set_next_enabled(step, true)
    }

    /// Block progressing past `step`
    pub fn disable(&mut self, step: usize) -> Option<StepEvent> {
        self.set_next_enabled(step, false)
    }

    /// Set the "next" flag of `step`
    ///
    /// Returns [`StepEvent::Shown`] when disabling a step the user had
    /// already passed moved them back to it.
    pub fn set_next_enabled(&mut self, step: usize, enabled: bool) -> Option<StepEvent> {
        let flag = self.next_enabled.get_mut(step)?;
        *flag = enabled;
        if !enabled && step < self.current {
            self.current = step;
            return Some(StepEvent::Shown(step));
        }
        None
    }

    /// Jump to `step`
    pub fn show(&mut self, step: usize) -> Result<StepEvent, StepError> {
        if step >= self.len() {
            return Err(StepError::OutOfRange {
                step,
                len: self.len(),
            });
        }
        if let Some(blocked_by) = self.next_enabled[..step].iter().position(|e| !*e) {
            return Err(StepError::Gated { step, blocked_by });
        }
        self.current = step;
        Ok(StepEvent::Shown(step))
    }

    /// Progress past the current step
    pub fn next(&mut self) -> Result<StepEvent, StepError> {
        if !self.is_next_enabled(self.current) {
            return Err(StepError::Gated {
                step: self.current + 1,
                blocked_by: self.current,
            });
        }
        if self.current == self.last() {
            return Ok(StepEvent::AllDone);
        }
        self.current += 1;
        Ok(StepEvent::Shown(self.current))
    }

    /// Progress past the current step if `predicate` accepts it
    pub fn advance_if(&mut self, predicate: impl FnOnce(usize) -> bool) -> Option<StepEvent> {
        if predicate(self.current) {
            self.next().ok()
        } else {
            None
        }
    }

    /// Return to the previous step
    pub fn back(&mut self) -> Option<StepEvent> {
        if self.current == 0 {
            return None;
        }
        self.current -= 1;
        Some(StepEvent::Shown(self.current))
    }
}

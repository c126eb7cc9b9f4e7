//! Placement marker gestures

use crate::mode::ModePredicate;
use crate::types::Location;
use tracing::debug;

/// A user move of the marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerMove {
    /// First move since the marker was placed or re-armed
    First,
    /// Any later move
    Subsequent,
}

/// Tracks user manipulation of the placement marker
///
/// Programmatic placement never counts as a move; only drags the mode
/// predicate attributes to this workflow do.
pub struct MarkerGesture {
    owns: ModePredicate,
    location: Option<Location>,
    armed: bool,
    moved: bool,
}

impl std::fmt::Debug for MarkerGesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerGesture")
            .field("location", &self.location)
            .field("armed", &self.armed)
            .field("moved", &self.moved)
            .finish_non_exhaustive()
    }
}

impl MarkerGesture {
    /// Create a gesture tracker filtered by `owns`
    pub fn new(owns: ModePredicate) -> Self {
        Self {
            owns,
            location: None,
            armed: false,
            moved: false,
        }
    }

    /// Whether this workflow currently owns marker interaction
    pub fn owns(&self) -> bool {
        (self.owns)()
    }

    /// Marker location, if placed
    pub const fn location(&self) -> Option<Location> {
        self.location
    }

    /// Whether the user has moved the marker since it was last armed
    pub const fn has_moved(&self) -> bool {
        self.moved
    }

    /// Whether dragging is enabled
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Place the marker programmatically
    pub const fn place(&mut self, location: Location) {
        self.location = Some(location);
        self.moved = false;
    }

    /// Enable dragging and wait for a fresh first move
    pub const fn arm(&mut self) {
        self.armed = true;
        self.moved = false;
    }

    /// Enable dragging again without resetting the first-move state
    pub const fn resume(&mut self) {
        self.armed = true;
    }

    /// Disable dragging
    pub const fn disarm(&mut self) {
        self.armed = false;
    }

    /// Forget the marker entirely
    pub const fn reset(&mut self) {
        self.location = None;
        self.armed = false;
        self.moved = false;
    }

    /// Record a user move; `None` when it does not belong to this workflow
    pub fn on_user_move(&mut self, location: Location) -> Option<MarkerMove> {
        if !self.owns() {
            debug!("marker move ignored: another mode owns the marker");
            return None;
        }
        if self.location.is_none() || !self.armed {
            debug!("marker move ignored: marker not draggable");
            return None;
        }

        self.location = Some(location);
        if self.moved {
            Some(MarkerMove::Subsequent)
        } else {
            self.moved = true;
            Some(MarkerMove::First)
        }
    }
}

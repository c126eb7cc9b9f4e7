//! Page-level mode ownership
//!
//! Several workflows (add-tree, add-resource, exploration) share one map
//! marker, but only one of them is the active mode at a time. The host's mode
//! manager hands each workflow a [`ModeToken`]; the workflow filters every
//! marker-derived event through a [`ModePredicate`] bound to its token.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Identifies one registered mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModeToken(u64);

impl ModeToken {
    /// Raw token value
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// "Is this workflow the authorized consumer of marker events right now?"
pub type ModePredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Predicate for hosts that give a workflow exclusive marker ownership
pub fn always_owned() -> ModePredicate {
    Arc::new(|| true)
}

/// Tracks which registered mode currently owns the map
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct ModeManager {
    active: Arc<AtomicU64>,
    issued: Arc<AtomicU64>,
}

/// No mode active
const NONE: u64 = 0;

impl ModeManager {
    /// Create a manager with no active mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new mode and return its token
    pub fn register(&self) -> ModeToken {
        ModeToken(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Make `token` the active mode
    pub fn activate(&self, token: ModeToken) {
        debug!(token = token.0, "activating mode");
        self.active.store(token.0, Ordering::SeqCst);
    }

    /// Clear the active mode if `token` holds it
    pub fn release(&self, token: ModeToken) {
        let _ = self
            .active
            .compare_exchange(token.0, NONE, Ordering::SeqCst, Ordering::SeqCst);
    }

    /// Currently active mode, if any
    pub fn active(&self) -> Option<ModeToken> {
        match self.active.load(Ordering::SeqCst) {
            NONE => None,
            raw => Some(ModeToken(raw)),
        }
    }

    /// Whether `token` is the active mode
    pub fn is_active(&self, token: ModeToken) -> bool {
        self.active.load(Ordering::SeqCst) == token.0
    }

    /// Predicate bound to `token`, for injection into a workflow
    pub fn predicate(&self, token: ModeToken) -> ModePredicate {
        let manager = self.clone();
        Arc::new(move || manager.is_active(token))
    }
}

//! Reverse-geocoded address display
//!
//! Every marker move starts a lookup; only the newest one may write to the
//! address box. Failures clear the box and nothing else.

use crate::error::Result;
use crate::types::{Address, Location};
use crate::workflow::location::Attempt;
use tracing::debug;

/// What to do with the address display after a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressUpdate {
    /// Write the resolved address
    Set {
        /// Full single-line address for the address box
        line: String,
        /// Summary line one
        street: String,
        /// Summary line two
        locality: String,
    },
    /// Lookup failed; empty the address box
    Clear,
    /// A newer move (or deactivation) superseded this lookup
    Stale,
}

/// Keeps the address display in sync with the marker
#[derive(Debug, Clone, Default)]
pub struct ReverseAddressSync {
    generation: u64,
}

impl ReverseAddressSync {
    /// Create an idle sync
    pub const fn new() -> Self {
        Self { generation: 0 }
    }

    /// The marker moved; returns the stamp for the lookup to start
    pub fn on_marker_moved(&mut self, location: Location) -> Attempt {
        self.generation += 1;
        debug!(generation = self.generation, x = location.x, y = location.y, "reverse geocode requested");
        Attempt(self.generation)
    }

    /// Feed a reverse-geocode response back in
    pub fn resolve(&self, attempt: Attempt, result: Result<Address>) -> AddressUpdate {
        if attempt.0 != self.generation {
            return AddressUpdate::Stale;
        }
        match result {
            Ok(address) => AddressUpdate::Set {
                line: address.one_line(),
                locality: address.locality(),
                street: address.street,
            },
            Err(e) => {
                debug!(error = %e, "reverse geocode failed");
                AddressUpdate::Clear
            }
        }
    }

    /// Drop every pending lookup
    pub const fn invalidate(&mut self) {
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn address() -> Address {
        Address {
            street: "100 Main St".to_string(),
            city: "Philadelphia".to_string(),
            region: "PA".to_string(),
            postal: "19107".to_string(),
        }
    }

    #[test]
    fn test_success_formats_display() {
        let mut sync = ReverseAddressSync::new();
        let attempt = sync.on_marker_moved(Location::new(0.0, 0.0));
        assert_eq!(
            sync.resolve(attempt, Ok(address())),
            AddressUpdate::Set {
                line: "100 Main St Philadelphia PA 19107".to_string(),
                street: "100 Main St".to_string(),
                locality: "Philadelphia PA 19107".to_string(),
            }
        );
    }

    #[test]
    fn test_failure_clears() {
        let mut sync = ReverseAddressSync::new();
        let attempt = sync.on_marker_moved(Location::new(0.0, 0.0));
        let update = sync.resolve(attempt, Err(Error::ReverseGeocode("timeout".to_string())));
        assert_eq!(update, AddressUpdate::Clear);
    }

    #[test]
    fn test_only_newest_move_wins() {
        let mut sync = ReverseAddressSync::new();
        let first = sync.on_marker_moved(Location::new(0.0, 0.0));
        let second = sync.on_marker_moved(Location::new(1.0, 1.0));
        assert_eq!(sync.resolve(first, Ok(address())), AddressUpdate::Stale);
        assert!(matches!(sync.resolve(second, Ok(address())), AddressUpdate::Set { .. }));

        sync.invalidate();
        assert_eq!(sync.resolve(second, Ok(address())), AddressUpdate::Stale);
    }
}

//! Initial location acquisition
//!
//! Three sources race to choose the marker's starting point: device
//! geolocation, address search and a direct map click. Lookups are stamped
//! with the generation current when they started; every cleanup event (a new
//! search, a successful alternate source, the first marker move, submit,
//! deactivate) starts a new generation, so a slow response from an older one
//! can never override a location chosen through a faster path.

use crate::error::Result;
use crate::types::{GeocodeCandidate, LonLat, Location};
use tracing::debug;

/// Generation stamp carried by an asynchronous lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attempt(pub(crate) u64);

/// Where a chosen location came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    /// Device location
    Geolocation,
    /// Address search result or suggestion
    AddressSearch,
    /// Direct map click
    MapClick,
}

impl std::fmt::Display for LocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Geolocation => write!(f, "geolocation"),
            Self::AddressSearch => write!(f, "address search"),
            Self::MapClick => write!(f, "map click"),
        }
    }
}

/// A location choice handed to the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChosenLocation {
    /// Map-plane coordinate
    pub location: Location,
    /// Source that produced it
    pub source: LocationSource,
}

/// Result of feeding a geocode response back in
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Exactly one match; chosen without asking
    Chosen(ChosenLocation),
    /// Several matches; the user must pick one
    Suggest(Vec<GeocodeCandidate>),
    /// Lookup failed or found nothing
    Failed,
    /// Superseded by a later cleanup event
    Stale,
}

/// Result of feeding a geolocation response back in
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeolocationOutcome {
    /// Device reported a position
    Chosen(ChosenLocation),
    /// Device lookup failed
    Failed,
    /// Superseded by a later cleanup event
    Stale,
}

/// Merges the three location sources into one "location chosen" signal
#[derive(Debug, Clone)]
pub struct LocationAcquirer {
    generation: u64,
    geolocation_supported: bool,
    suggestions: Vec<GeocodeCandidate>,
}

impl LocationAcquirer {
    /// Create an acquirer; geolocation can only be turned off afterwards
    pub const fn new(geolocation_supported: bool) -> Self {
        Self {
            generation: 0,
            geolocation_supported,
            suggestions: Vec::new(),
        }
    }

    /// Whether the geolocate control is usable
    pub const fn geolocation_supported(&self) -> bool {
        self.geolocation_supported
    }

    /// Turn geolocation off for good
    pub(crate) const fn disable_geolocation(&mut self) {
        self.geolocation_supported = false;
    }

    /// Pending suggestion list
    pub fn suggestions(&self) -> &[GeocodeCandidate] {
        &self.suggestions
    }

    /// Invalidate every pending lookup and drop any suggestion list
    pub fn cleanup(&mut self) {
        self.generation += 1;
        self.suggestions.clear();
        debug!(generation = self.generation, "location feedback cleanup");
    }

    /// Start an address search; `None` for blank text
    ///
    /// Triggering a search is itself a cleanup event, even for blank text.
    pub fn begin_search(&mut self, address: &str) -> Option<Attempt> {
        self.cleanup();
        if address.trim().is_empty() {
            return None;
        }
        Some(Attempt(self.generation))
    }

    /// Feed a geocode response back in
    pub fn resolve_search(
        &mut self,
        attempt: Attempt,
        result: Result<Vec<GeocodeCandidate>>,
    ) -> SearchOutcome {
        if attempt.0 != self.generation {
            debug!(attempt = attempt.0, generation = self.generation, "stale geocode response");
            return SearchOutcome::Stale;
        }

        match result {
            Ok(mut candidates) if candidates.len() == 1 => {
                let candidate = candidates.remove(0);
                SearchOutcome::Chosen(ChosenLocation {
                    location: candidate.location,
                    source: LocationSource::AddressSearch,
                })
            }
            Ok(candidates) if !candidates.is_empty() => {
                self.suggestions.clone_from(&candidates);
                SearchOutcome::Suggest(candidates)
            }
            Ok(_) => {
                debug!("geocoder found no candidates");
                SearchOutcome::Failed
            }
            Err(e) => {
                debug!(error = %e, "geocode failed");
                SearchOutcome::Failed
            }
        }
    }

    /// Start a device location lookup; `None` when unsupported
    ///
    /// Not a cleanup event: a search still pending keeps its chance to land.
    pub fn begin_geolocation(&self) -> Option<Attempt> {
        self.geolocation_supported.then_some(Attempt(self.generation))
    }

    /// Feed a device location response back in
    pub fn resolve_geolocation(
        &mut self,
        attempt: Attempt,
        result: Result<LonLat>,
    ) -> GeolocationOutcome {
        if attempt.0 != self.generation {
            debug!(attempt = attempt.0, generation = self.generation, "stale geolocation response");
            return GeolocationOutcome::Stale;
        }

        match result {
            Ok(lon_lat) => {
                self.cleanup();
                GeolocationOutcome::Chosen(ChosenLocation {
                    location: lon_lat.to_web_mercator(),
                    source: LocationSource::Geolocation,
                })
            }
            Err(e) => {
                debug!(error = %e, "geolocation failed");
                GeolocationOutcome::Failed
            }
        }
    }

    /// Pick one of the pending suggestions
    pub fn select_suggestion(&mut self, index: usize) -> Option<ChosenLocation> {
        let candidate = self.suggestions.get(index)?;
        let chosen = ChosenLocation {
            location: candidate.location,
            source: LocationSource::AddressSearch,
        };
        self.cleanup();
        Some(chosen)
    }

    /// A map click while placement is armed
    pub fn map_clicked(&mut self, location: Location) -> ChosenLocation {
        self.cleanup();
        ChosenLocation {
            location,
            source: LocationSource::MapClick,
        }
    }
}

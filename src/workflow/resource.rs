//! Resource variant: type choice, sub-forms and roof geometry
//!
//! Resources add three steps around the location step: choosing a type
//! (which loads that type's sub-form), outlining a roof or footprint polygon,
//! and answering the type's questions.

use crate::form::SubForm;
use crate::types::{LonLat, Location};
use std::collections::HashMap;
use tracing::debug;

/// Choose the resource type
pub const STEP_CHOOSE_TYPE: usize = 0;
/// Place and move the marker
pub const STEP_LOCATE: usize = 1;
/// Outline the roof / footprint
pub const STEP_ROOF_GEOMETRY: usize = 2;
/// Answer the type's questions
pub const STEP_DETAILS: usize = 3;
/// Choose a disposition and save
pub const STEP_FINAL: usize = 4;

/// Number of resource steps
pub const RESOURCE_STEP_COUNT: usize = STEP_FINAL + 1;

/// Summary sub-heading shown once a type is chosen
pub const RESOURCE_SUBHEAD: &str = "Resource";

/// Side of the initial roof square, in metres
const ROOF_SIZE_METERS: f64 = 20.0;

/// The chosen resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceType {
    /// Type key used in URLs
    pub key: String,
    /// Human label
    pub label: String,
}

/// Per-activation resource state plus the page-lifetime sub-form cache
#[derive(Debug, Clone, Default)]
pub struct ResourceSteps {
    chosen: Option<ResourceType>,
    sub_forms: HashMap<String, SubForm>,
    roof: Option<Vec<Location>>,
}

impl ResourceSteps {
    /// Create empty resource state
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently chosen type
    pub const fn chosen(&self) -> Option<&ResourceType> {
        self.chosen.as_ref()
    }

    /// Record a type choice
    pub fn choose(&mut self, key: &str, label: &str) {
        self.chosen = Some(ResourceType {
            key: key.to_string(),
            label: label.to_string(),
        });
    }

    /// Whether `key` is the chosen type
    pub fn is_chosen(&self, key: &str) -> bool {
        self.chosen.as_ref().is_some_and(|t| t.key == key)
    }

    /// Cached sub-form for a type
    pub fn sub_form(&self, key: &str) -> Option<&SubForm> {
        self.sub_forms.get(key)
    }

    /// Sub-form of the chosen type, once loaded
    pub fn active_sub_form(&self) -> Option<&SubForm> {
        self.chosen.as_ref().and_then(|t| self.sub_forms.get(&t.key))
    }

    /// Cache a loaded sub-form
    pub fn cache_sub_form(&mut self, key: &str, sub_form: SubForm) {
        debug!(feature_type = key, "caching sub-form");
        self.sub_forms.insert(key.to_string(), sub_form);
    }

    /// Roof polygon, once built
    pub fn roof(&self) -> Option<&[Location]> {
        self.roof.as_deref()
    }

    /// Build the roof polygon at `marker` unless one exists
    ///
    /// Returns the new ring when one was built.
    pub fn ensure_roof(&mut self, marker: Location) -> Option<&[Location]> {
        if self.roof.is_some() {
            return None;
        }
        self.roof = Some(roof_ring(marker));
        self.roof.as_deref()
    }

    /// Clear the type choice and roof; keep the sub-form cache
    ///
    /// Returns whether a roof polygon was drawn.
    pub fn reset(&mut self) -> bool {
        self.chosen = None;
        self.roof.take().is_some()
    }
}

/// Square ring anchored at `marker`, extending south-west
pub fn roof_ring(marker: Location) -> Vec<Location> {
    let p1 = marker.to_lon_lat();
    let p2 = p1.offset_by_meters(-ROOF_SIZE_METERS, -ROOF_SIZE_METERS);
    [
        (p1.lon, p1.lat),
        (p1.lon, p2.lat),
        (p2.lon, p2.lat),
        (p2.lon, p1.lat),
        (p1.lon, p1.lat),
    ]
    .into_iter()
    .map(|(lon, lat)| LonLat::new(lon, lat).to_web_mercator())
    .collect()
}

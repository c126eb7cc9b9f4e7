//! Collaborators consumed by the workflow
//!
//! Network-backed lookups are async traits executed by the session loop; the
//! map surface and street-view panel are synchronous and driven directly by
//! the controller.

mod endpoints;
mod factory;
mod http;

pub use endpoints::{feature_collection_url, feature_edit_url, plots_url, validate_feature_type};
pub use factory::create_services;
pub use http::InstanceClient;

use crate::config::GeolocationOptions;
use crate::error::{Error, Result};
use crate::form::SubForm;
use crate::submit::{CreatedFeature, SubmissionPayload, SubmitError};
use crate::types::{Address, GeocodeCandidate, LonLat, Location};
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// Device location lookup
#[async_trait]
pub trait Geolocator: Send + Sync {
    /// Whether the device can report its location at all
    ///
    /// Checked once when a session starts; an unsupported geolocator
    /// disables the geolocate control for the workflow's lifetime.
    fn is_supported(&self) -> bool {
        true
    }

    /// Read the device's current position
    async fn current_position(&self, options: &GeolocationOptions) -> Result<LonLat>;
}

/// Forward geocoding: address text to candidate locations
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up candidates for an address
    async fn forward_geocode(&self, address: &str) -> Result<Vec<GeocodeCandidate>>;
}

/// Reverse geocoding: location to street address
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Resolve the address nearest to a location
    async fn reverse_geocode(&self, location: Location) -> Result<Address>;
}

/// Feature collection endpoint
#[async_trait]
pub trait FeatureEndpoint: Send + Sync {
    /// POST a new feature
    async fn create_feature(
        &self,
        url: &Url,
        payload: &SubmissionPayload,
    ) -> std::result::Result<CreatedFeature, SubmitError>;
}

/// Source of per-type resource sub-forms
#[async_trait]
pub trait SubFormSource: Send + Sync {
    /// Fetch the sub-form for a resource type
    async fn load_sub_form(&self, feature_type: &str) -> Result<SubForm>;
}

/// The interactive map the workflow places its marker on
pub trait MapSurface: Send {
    /// Pan to a location
    fn set_center(&mut self, location: Location);

    /// Pan to a location and zoom in to at least `zoom`
    fn set_center_and_zoom_in(&mut self, location: Location, zoom: u8);

    /// Show the marker at a location
    fn place_marker(&mut self, location: Location);

    /// Remove the marker from the map
    fn hide_marker(&mut self);

    /// Let a map click choose the marker location
    fn enable_marker_placing(&mut self);

    /// Let the user drag the marker
    fn enable_marker_moving(&mut self);

    /// Pin the marker in place
    fn disable_marker_moving(&mut self);

    /// Refresh layers after the geometry revision changed
    fn update_revision_token(&mut self, token: &str);

    /// Draw an editable polygon (closed ring)
    fn add_editable_polygon(&mut self, ring: &[Location]);

    /// Remove the editable polygon
    fn remove_editable_polygon(&mut self);
}

/// Creates street-view panels
pub trait StreetViewProvider: Send {
    /// Create a panel looking at `location`
    fn create(
        &mut self,
        location: Location,
        no_imagery_text: Option<&str>,
    ) -> Box<dyn StreetViewPanel>;
}

/// A live street-view panel
pub trait StreetViewPanel: Send {
    /// Point the panel at a new location
    fn update(&mut self, location: Location);
}

/// Geolocator for hosts without device location support
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl Geolocator for NoGeolocation {
    fn is_supported(&self) -> bool {
        false
    }

    async fn current_position(&self, _options: &GeolocationOptions) -> Result<LonLat> {
        Err(Error::Geolocation(
            "device location is not available".to_string(),
        ))
    }
}

/// Async collaborators shared by every request a session executes
#[derive(Clone)]
pub struct Services {
    /// Device location
    pub geolocator: Arc<dyn Geolocator>,
    /// Address search
    pub geocoder: Arc<dyn Geocoder>,
    /// Marker address lookup
    pub reverse_geocoder: Arc<dyn ReverseGeocoder>,
    /// Feature POST target
    pub features: Arc<dyn FeatureEndpoint>,
    /// Resource sub-form loader
    pub sub_forms: Arc<dyn SubFormSource>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("geolocation_supported", &self.geolocator.is_supported())
            .finish_non_exhaustive()
    }
}

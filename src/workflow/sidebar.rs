//! Sidebar view model rendered by the host

use crate::types::GeocodeCandidate;

/// Instruction shown above the location step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// "Search, geolocate or click the map to place the marker"
    PlaceMarker,
    /// "Drag the marker to the exact spot"
    MoveMarker,
}

/// Everything the host needs to draw the workflow sidebar
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sidebar {
    /// Workflow's navigation link is highlighted
    pub nav_active: bool,
    /// Marker instruction, if any
    pub prompt: Option<Prompt>,
    /// Address search failed
    pub geocode_error: bool,
    /// Device location failed
    pub geolocate_error: bool,
    /// Geolocate control usable
    pub geolocate_enabled: bool,
    /// Address box text
    pub address_text: String,
    /// Two-line address summary (street, locality)
    pub summary_address: Option<(String, String)>,
    /// Pending geocode suggestions
    pub suggestions: Vec<GeocodeCandidate>,
    /// Attribute fields editable
    pub fields_enabled: bool,
    /// Street-view panel shown
    pub street_view_visible: bool,
    /// Summary heading (resource type label)
    pub summary_head: Option<String>,
    /// Summary sub-heading
    pub summary_subhead: Option<String>,
}

impl Sidebar {
    /// Hide location errors and suggestions
    pub(crate) fn clear_location_feedback(&mut self) {
        self.geocode_error = false;
        self.geolocate_error = false;
        self.suggestions.clear();
    }
}

//! Map surface and street-view doubles that record every call

use feature_placement::services::{MapSurface, StreetViewPanel, StreetViewProvider};
use feature_placement::types::Location;
use std::sync::{Arc, Mutex};

/// One call made on the map surface
#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    SetCenter(Location),
    SetCenterAndZoomIn(Location, u8),
    PlaceMarker(Location),
    HideMarker,
    EnablePlacing,
    EnableMoving,
    DisableMoving,
    RevisionToken(String),
    AddPolygon(Vec<Location>),
    RemovePolygon,
}

/// Map surface that records calls; clones share the log
#[derive(Debug, Clone, Default)]
pub struct RecordingMap {
    calls: Arc<Mutex<Vec<MapCall>>>,
}

#[allow(dead_code)]
impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boxed clone for handing to a builder
    pub fn boxed(&self) -> Box<dyn MapSurface> {
        Box::new(self.clone())
    }

    pub fn calls(&self) -> Vec<MapCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn contains(&self, call: &MapCall) -> bool {
        self.calls.lock().unwrap().contains(call)
    }

    /// Where the marker was last placed
    pub fn last_marker(&self) -> Option<Location> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|call| match call {
                MapCall::PlaceMarker(location) => Some(*location),
                _ => None,
            })
    }

    pub fn count(&self, predicate: impl Fn(&MapCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: MapCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MapSurface for RecordingMap {
    fn set_center(&mut self, location: Location) {
        self.record(MapCall::SetCenter(location));
    }

    fn set_center_and_zoom_in(&mut self, location: Location, zoom: u8) {
        self.record(MapCall::SetCenterAndZoomIn(location, zoom));
    }

    fn place_marker(&mut self, location: Location) {
        self.record(MapCall::PlaceMarker(location));
    }

    fn hide_marker(&mut self) {
        self.record(MapCall::HideMarker);
    }

    fn enable_marker_placing(&mut self) {
        self.record(MapCall::EnablePlacing);
    }

    fn enable_marker_moving(&mut self) {
        self.record(MapCall::EnableMoving);
    }

    fn disable_marker_moving(&mut self) {
        self.record(MapCall::DisableMoving);
    }

    fn update_revision_token(&mut self, token: &str) {
        self.record(MapCall::RevisionToken(token.to_string()));
    }

    fn add_editable_polygon(&mut self, ring: &[Location]) {
        self.record(MapCall::AddPolygon(ring.to_vec()));
    }

    fn remove_editable_polygon(&mut self) {
        self.record(MapCall::RemovePolygon);
    }
}

/// One street-view interaction
#[derive(Debug, Clone, PartialEq)]
pub enum StreetViewCall {
    Create(Location, Option<String>),
    Update(Location),
}

/// Street-view provider whose panels record into a shared log
#[derive(Debug, Clone, Default)]
pub struct RecordingStreetView {
    calls: Arc<Mutex<Vec<StreetViewCall>>>,
}

struct RecordingPanel {
    calls: Arc<Mutex<Vec<StreetViewCall>>>,
}

#[allow(dead_code)]
impl RecordingStreetView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed(&self) -> Box<dyn StreetViewProvider> {
        Box::new(self.clone())
    }

    pub fn calls(&self) -> Vec<StreetViewCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl StreetViewProvider for RecordingStreetView {
    fn create(
        &mut self,
        location: Location,
        no_imagery_text: Option<&str>,
    ) -> Box<dyn StreetViewPanel> {
        self.calls.lock().unwrap().push(StreetViewCall::Create(
            location,
            no_imagery_text.map(str::to_string),
        ));
        Box::new(RecordingPanel {
            calls: self.calls.clone(),
        })
    }
}

impl StreetViewPanel for RecordingPanel {
    fn update(&mut self, location: Location) {
        self.calls
            .lock()
            .unwrap()
            .push(StreetViewCall::Update(location));
    }
}

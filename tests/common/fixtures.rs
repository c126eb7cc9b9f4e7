//! Test fixtures and workflow drivers

#![allow(dead_code)]

use super::recording_map::RecordingMap;
use feature_placement::form::{FieldKind, FieldSpec, SubForm, ValidationErrors};
use feature_placement::submit::{CreatedFeature, PreparedSubmission};
use feature_placement::types::{Address, Basemap, GeocodeCandidate, LonLat, Location};
use feature_placement::workflow::{Attempt, Request, WorkflowBuilder, WorkflowController};
use feature_placement::WorkflowConfig;
use url::Url;

pub fn instance_url() -> Url {
    Url::parse("https://example.org/phl/").unwrap()
}

pub fn config() -> WorkflowConfig {
    WorkflowConfig::new(instance_url())
}

pub fn google_config() -> WorkflowConfig {
    let mut config = config();
    config.basemap = Basemap::Google;
    config.no_street_view_text = Some("No street view here".to_string());
    config
}

pub fn tree_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("tree.species", FieldKind::ForeignKey),
        FieldSpec::new("tree.diameter", FieldKind::Float),
        FieldSpec::new("tree.height", FieldKind::Int),
        FieldSpec::new("tree.date_planted", FieldKind::Date),
        FieldSpec::new("tree.readonly", FieldKind::Bool),
        FieldSpec::new("plot.owner_orig_id", FieldKind::String),
    ]
}

/// Philadelphia City Hall
pub fn city_hall() -> Location {
    LonLat::new(-75.1635, 39.9526).to_web_mercator()
}

pub fn nudge(location: Location, dx: f64, dy: f64) -> Location {
    Location::new(location.x + dx, location.y + dy)
}

pub fn candidate(address: &str, location: Location) -> GeocodeCandidate {
    GeocodeCandidate {
        address: address.to_string(),
        location,
        score: Some(100.0),
    }
}

pub fn address() -> Address {
    Address {
        street: "1400 John F Kennedy Blvd".to_string(),
        city: "Philadelphia".to_string(),
        region: "PA".to_string(),
        postal: "19107".to_string(),
    }
}

pub fn created(feature_id: u64) -> CreatedFeature {
    CreatedFeature {
        geo_rev_hash: Some("rev-2".to_string()),
        enabled: true,
        feature_id: Some(feature_id),
    }
}

pub fn validation_errors(field: &str, message: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.insert(field.to_string(), vec![message.to_string()]);
    errors
}

/// Sub-form with one conditional question and one plain question
pub fn green_roof() -> SubForm {
    serde_json::from_value(serde_json::json!({
        "fields": [{"name": "resource.name"}],
        "questions": [
            {
                "field": {"name": "resource.has_irrigation", "kind": "bool"},
                "subquestions": [
                    {"field": {"name": "resource.irrigation_type", "kind": "choice"}}
                ]
            },
            {"field": {"name": "resource.area", "kind": "float"}}
        ]
    }))
    .unwrap()
}

pub fn point_workflow(map: &RecordingMap) -> WorkflowController {
    WorkflowBuilder::point(config())
        .fields(tree_fields())
        .build(map.boxed())
        .unwrap()
}

pub fn resource_workflow(map: &RecordingMap) -> WorkflowController {
    WorkflowBuilder::resource(config())
        .build(map.boxed())
        .unwrap()
}

/// Activate, place the marker by map click and drag it once
pub fn place_and_move(workflow: &mut WorkflowController, at: Location) {
    workflow.activate();
    workflow.map_clicked(at);
    workflow.marker_moved(nudge(at, 3.0, -2.0));
    workflow.take_requests();
}

/// Drain requests and return the first one `pick` accepts
pub fn find_request<T>(
    workflow: &mut WorkflowController,
    pick: impl Fn(Request) -> Option<T>,
) -> T {
    workflow
        .take_requests()
        .into_iter()
        .find_map(pick)
        .expect("expected request was not queued")
}

pub fn take_submit(workflow: &mut WorkflowController) -> PreparedSubmission {
    find_request(workflow, |request| match request {
        Request::Submit(prepared) => Some(prepared),
        _ => None,
    })
}

pub fn take_geocode(workflow: &mut WorkflowController) -> (Attempt, String) {
    find_request(workflow, |request| match request {
        Request::ForwardGeocode { attempt, address } => Some((attempt, address)),
        _ => None,
    })
}

pub fn take_geolocate(workflow: &mut WorkflowController) -> Attempt {
    find_request(workflow, |request| match request {
        Request::Geolocate { attempt, .. } => Some(attempt),
        _ => None,
    })
}

pub fn take_reverse(workflow: &mut WorkflowController) -> (Attempt, Location) {
    find_request(workflow, |request| match request {
        Request::ReverseGeocode { attempt, location } => Some((attempt, location)),
        _ => None,
    })
}

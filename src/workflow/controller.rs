//! Workflow controller
//!
//! Composes location acquisition, marker gestures, address sync, step
//! sequencing and submission into the placement state machine:
//!
//! ```text
//! Inactive        --activate-------------------> CanPlaceMarker
//! CanPlaceMarker  --location chosen------------> CanMoveMarker
//! CanMoveMarker   --first marker move----------> CanAddFeature
//! CanAddFeature   --saved, copy / new----------> CanPlaceMarker (marker re-armed)
//! CanAddFeature   --saved, edit / close / hidden-> Inactive
//! any active      --cancel / deactivate--------> Inactive
//! ```
//!
//! The controller performs no I/O and never returns errors to its host:
//! lookups leave as [`Request`]s, answers come back as [`Completion`]s, and
//! every failure ends up in the [`Sidebar`], on a form field, or in the log.

use crate::config::WorkflowConfig;
use crate::error::Result;
use crate::form::{AttributeForm, FieldSpec, FieldValue, SubForm, ValidationErrors};
use crate::mode::{ModePredicate, always_owned};
use crate::services::{
    MapSurface, StreetViewPanel, StreetViewProvider, feature_collection_url, feature_edit_url,
    plots_url,
};
use crate::submit::{
    CreatedFeature, Disposition, FeatureSubmitter, Receipt, SaveHook, SubmissionId,
    SubmissionResult, SubmitError,
};
use crate::types::Location;
use crate::workflow::address::{AddressUpdate, ReverseAddressSync};
use crate::workflow::events::{Completion, HostEvent, Request};
use crate::workflow::location::{
    ChosenLocation, GeolocationOutcome, LocationAcquirer, SearchOutcome,
};
use crate::workflow::marker::{MarkerGesture, MarkerMove};
use crate::workflow::phase::Phase;
use crate::workflow::resource::{
    RESOURCE_STEP_COUNT, RESOURCE_SUBHEAD, ResourceSteps, STEP_CHOOSE_TYPE, STEP_DETAILS,
    STEP_LOCATE, STEP_ROOF_GEOMETRY,
};
use crate::workflow::sidebar::{Prompt, Sidebar};
use crate::workflow::steps::{StepError, StepEvent, StepSequencer};
use tracing::{debug, warn};
use url::Url;

/// Point variant: place the marker
pub const POINT_STEP_LOCATE: usize = 0;
/// Point variant: fill in attributes
pub const POINT_STEP_DETAILS: usize = 1;
/// Point variant: choose a disposition and save
pub const POINT_STEP_FINAL: usize = 2;

const POINT_STEP_COUNT: usize = POINT_STEP_FINAL + 1;

/// Which kind of feature the workflow adds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// A tree / plot at a single point
    Point,
    /// A mapped resource with a type, sub-form and roof polygon
    Resource,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Point => write!(f, "point"),
            Self::Resource => write!(f, "resource"),
        }
    }
}

struct StreetView {
    provider: Box<dyn StreetViewProvider>,
    panel: Option<Box<dyn StreetViewPanel>>,
}

/// Builder for [`WorkflowController`]
pub struct WorkflowBuilder {
    config: WorkflowConfig,
    variant: Variant,
    owns: ModePredicate,
    fields: Vec<FieldSpec>,
    geolocation_supported: bool,
    before_save: Option<SaveHook>,
    street_view: Option<Box<dyn StreetViewProvider>>,
}

impl WorkflowBuilder {
    fn new(config: WorkflowConfig, variant: Variant) -> Self {
        Self {
            config,
            variant,
            owns: always_owned(),
            fields: Vec::new(),
            geolocation_supported: true,
            before_save: None,
            street_view: None,
        }
    }

    /// Start building a point-feature workflow
    pub fn point(config: WorkflowConfig) -> Self {
        Self::new(config, Variant::Point)
    }

    /// Start building a resource workflow
    pub fn resource(config: WorkflowConfig) -> Self {
        Self::new(config, Variant::Resource)
    }

    /// Filter marker events through the host's mode ownership
    #[must_use]
    pub fn mode_predicate(mut self, owns: ModePredicate) -> Self {
        self.owns = owns;
        self
    }

    /// Attribute fields (resources replace them with each type's sub-form)
    #[must_use]
    pub fn fields(mut self, specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields = specs.into_iter().collect();
        self
    }

    /// Whether the device can geolocate
    #[must_use]
    pub const fn geolocation_supported(mut self, supported: bool) -> Self {
        self.geolocation_supported = supported;
        self
    }

    /// Hook run on the serialized form before each save
    #[must_use]
    pub fn before_save(mut self, hook: SaveHook) -> Self {
        self.before_save = Some(hook);
        self
    }

    /// Street-view provider; ignored unless the basemap supports it
    #[must_use]
    pub fn street_view(mut self, provider: Box<dyn StreetViewProvider>) -> Self {
        self.street_view = Some(provider);
        self
    }

    /// Build the controller around a map surface
    pub fn build(self, map: Box<dyn MapSurface>) -> Result<WorkflowController> {
        let (step_count, location_step, submission_url, resource) = match self.variant {
            Variant::Point => (
                POINT_STEP_COUNT,
                POINT_STEP_LOCATE,
                Some(plots_url(&self.config.instance_url)?),
                None,
            ),
            Variant::Resource => (
                RESOURCE_STEP_COUNT,
                STEP_LOCATE,
                None,
                Some(ResourceSteps::new()),
            ),
        };

        let mut submitter = FeatureSubmitter::new(self.config.geometry_key.clone(), submission_url);
        if let Some(hook) = self.before_save {
            submitter.set_before_save(hook);
        }

        let street_view = if self.config.basemap.has_street_view() {
            self.street_view.map(|provider| StreetView {
                provider,
                panel: None,
            })
        } else {
            None
        };

        debug!(variant = %self.variant, steps = step_count, "built workflow");
        Ok(WorkflowController {
            variant: self.variant,
            location_step,
            phase: Phase::Inactive,
            steps: StepSequencer::new(step_count),
            acquirer: LocationAcquirer::new(self.geolocation_supported),
            marker: MarkerGesture::new(self.owns),
            address: ReverseAddressSync::new(),
            submitter,
            form: AttributeForm::new(self.fields),
            disposition: Disposition::default(),
            sidebar: Sidebar {
                geolocate_enabled: self.geolocation_supported,
                ..Sidebar::default()
            },
            resource,
            map,
            street_view,
            requests: Vec::new(),
            events: Vec::new(),
            config: self.config,
        })
    }
}

/// The feature-placement state machine
pub struct WorkflowController {
    config: WorkflowConfig,
    variant: Variant,
    location_step: usize,
    phase: Phase,
    steps: StepSequencer,
    acquirer: LocationAcquirer,
    marker: MarkerGesture,
    address: ReverseAddressSync,
    submitter: FeatureSubmitter,
    form: AttributeForm,
    disposition: Disposition,
    sidebar: Sidebar,
    resource: Option<ResourceSteps>,
    map: Box<dyn MapSurface>,
    street_view: Option<StreetView>,
    requests: Vec<Request>,
    events: Vec<HostEvent>,
}

impl std::fmt::Debug for WorkflowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowController")
            .field("variant", &self.variant)
            .field("phase", &self.phase)
            .field("steps", &self.steps)
            .field("marker", &self.marker)
            .field("submitter", &self.submitter)
            .finish_non_exhaustive()
    }
}

impl WorkflowController {
    // Accessors

    /// Lifecycle phase
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Point or resource
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Index of the location step
    pub const fn location_step(&self) -> usize {
        self.location_step
    }

    /// Step sequencer state
    pub const fn steps(&self) -> &StepSequencer {
        &self.steps
    }

    /// Sidebar view model
    pub const fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    /// Attribute form
    pub const fn form(&self) -> &AttributeForm {
        &self.form
    }

    /// Disposition that the next save will use
    pub const fn disposition(&self) -> Disposition {
        self.disposition
    }

    /// Marker location, once placed
    pub const fn marker_location(&self) -> Option<Location> {
        self.marker.location()
    }

    /// Where features are POSTed
    pub const fn submission_url(&self) -> Option<&Url> {
        self.submitter.url()
    }

    /// Whether a save is awaiting its response
    pub const fn is_submitting(&self) -> bool {
        self.submitter.is_in_flight()
    }

    /// Resource state (resource variant only)
    pub const fn resource(&self) -> Option<&ResourceSteps> {
        self.resource.as_ref()
    }

    /// Drain queued lookups
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }

    /// Drain queued host events
    pub fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    // Lifecycle

    /// Become the active mode; no-op when already active
    pub fn activate(&mut self) {
        if self.phase.is_active() {
            debug!(phase = %self.phase, "activate ignored: already active");
            return;
        }
        debug!(variant = %self.variant, "activating workflow");

        self.sidebar.nav_active = true;
        self.sidebar.geolocate_enabled = self.acquirer.geolocation_supported();
        self.map.hide_marker();
        self.marker.reset();
        self.map.enable_marker_placing();
        self.set_fields_enabled(false);
        self.sidebar.prompt = Some(Prompt::PlaceMarker);
        self.phase = Phase::CanPlaceMarker;
        self.events.push(HostEvent::Activated);

        if self.resource.is_some() {
            self.steps.disable(STEP_CHOOSE_TYPE);
        }
        self.steps.disable(self.location_step);
        self.show(0);
    }

    /// Deactivation by the host (another mode took over)
    pub fn deactivate(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        self.teardown();
        self.events.push(HostEvent::Deactivated);
    }

    /// The user cancelled
    pub fn cancel(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        self.close();
    }

    /// Change the feature collection URL
    pub fn set_submission_url(&mut self, url: Url) {
        self.submitter.set_url(url);
    }

    // Location sources

    /// The user pressed the geolocate control
    pub fn request_geolocation(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        match self.acquirer.begin_geolocation() {
            Some(attempt) => self.requests.push(Request::Geolocate {
                attempt,
                options: self.config.geolocation.clone(),
            }),
            None => debug!("geolocation unsupported"),
        }
    }

    /// The device cannot geolocate; disable the control for good
    pub(crate) fn disable_geolocation(&mut self) {
        debug!("geolocation unsupported; control disabled");
        self.acquirer.disable_geolocation();
        self.sidebar.geolocate_enabled = false;
    }

    /// The user edited the address box
    pub fn set_address_text(&mut self, text: impl Into<String>) {
        self.sidebar.address_text = text.into();
    }

    /// The user triggered an address search
    pub fn search_address(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        let address = self.sidebar.address_text.clone();
        let attempt = self.acquirer.begin_search(&address);
        self.sidebar.clear_location_feedback();
        if let Some(attempt) = attempt {
            debug!(address = %address, "searching address");
            self.requests
                .push(Request::ForwardGeocode { attempt, address });
        }
    }

    /// The user picked a geocode suggestion
    pub fn select_suggestion(&mut self, index: usize) {
        if !self.phase.is_active() {
            return;
        }
        match self.acquirer.select_suggestion(index) {
            Some(chosen) => {
                self.sidebar.clear_location_feedback();
                self.choose_location(chosen);
            }
            None => debug!(index, "no such suggestion"),
        }
    }

    /// The user clicked the map
    pub fn map_clicked(&mut self, location: Location) {
        if self.phase != Phase::CanPlaceMarker {
            debug!(phase = %self.phase, "map click ignored");
            return;
        }
        if !self.marker.owns() {
            debug!("map click ignored: another mode owns the marker");
            return;
        }
        let chosen = self.acquirer.map_clicked(location);
        self.sidebar.clear_location_feedback();
        self.choose_location(chosen);
    }

    /// The user dragged the marker
    pub fn marker_moved(&mut self, location: Location) {
        if !self.phase.is_active() {
            return;
        }
        let Some(movement) = self.marker.on_user_move(location) else {
            return;
        };
        if movement == MarkerMove::First {
            self.on_first_move();
        }

        let attempt = self.address.on_marker_moved(location);
        self.requests
            .push(Request::ReverseGeocode { attempt, location });
        self.show_street_view(location);
    }

    // Steps

    /// The user pressed "next" (on the last step this submits)
    pub fn next_step(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        match self.steps.next() {
            Ok(event) => self.on_step_event(event),
            Err(e) => debug!(error = %e, "next refused"),
        }
    }

    /// The user pressed "back"
    pub fn previous_step(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        if let Some(event) = self.steps.back() {
            self.on_step_event(event);
        }
    }

    /// Jump to a step, if every earlier step allows it
    pub fn show_step(&mut self, step: usize) {
        if self.phase.is_active() {
            self.show(step);
        }
    }

    // Attributes

    /// The user edited an attribute field
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) {
        if !self.form.is_enabled() {
            debug!(field = name, "field edit ignored: fields disabled");
            return;
        }
        if let Err(e) = self.form.set(name, value.into()) {
            warn!(field = name, error = %e, "field edit rejected");
            return;
        }
        self.refresh_details_gate();
    }

    /// The user chose what happens after saving
    pub const fn set_disposition(&mut self, disposition: Disposition) {
        self.disposition = disposition;
    }

    /// Disposition from the raw radio control value
    pub fn set_disposition_raw(&mut self, raw: &str) {
        match raw.parse() {
            Ok(disposition) => self.disposition = disposition,
            Err(e) => warn!(error = %e, "disposition ignored"),
        }
    }

    /// The user chose a resource type
    pub fn choose_feature_type(&mut self, key: &str, label: &str) {
        if !self.phase.is_active() {
            return;
        }
        let Some(resource) = self.resource.as_mut() else {
            warn!(feature_type = key, "feature types only apply to resources");
            return;
        };
        let url = match feature_collection_url(&self.config.instance_url, key) {
            Ok(url) => url,
            Err(e) => {
                warn!(feature_type = key, error = %e, "feature type rejected");
                return;
            }
        };

        debug!(feature_type = key, "resource type chosen");
        resource.choose(key, label);
        let cached = resource.sub_form(key).cloned();
        self.submitter.set_url(url);
        self.sidebar.summary_head = Some(label.to_string());
        self.sidebar.summary_subhead = Some(RESOURCE_SUBHEAD.to_string());

        self.steps.enable(STEP_CHOOSE_TYPE);
        self.steps.enable(STEP_ROOF_GEOMETRY);
        if let Some(event) = self.steps.disable(STEP_DETAILS) {
            self.on_step_event(event);
        }

        match cached {
            Some(sub_form) => self.apply_sub_form(&sub_form),
            None => self.requests.push(Request::LoadSubForm {
                feature_type: key.to_string(),
            }),
        }
    }

    // Submission

    /// Save the feature
    ///
    /// Ignored unless the marker has been confirmed, every step allows
    /// progressing and no other save is in flight.
    pub fn submit(&mut self) {
        if self.phase != Phase::CanAddFeature {
            debug!(phase = %self.phase, "submit ignored");
            return;
        }
        if !self.steps.all_enabled() {
            debug!("submit ignored: a step is incomplete");
            return;
        }
        if self.submitter.url().is_none() {
            warn!("submit ignored: no submission URL");
            return;
        }
        let Some(location) = self.marker.location() else {
            warn!("submit ignored: marker has no location");
            return;
        };
        let Some(prepared) = self
            .submitter
            .prepare(&self.form, location, self.disposition)
        else {
            return;
        };

        self.acquirer.cleanup();
        self.sidebar.clear_location_feedback();
        self.form.clear_errors();
        self.requests.push(Request::Submit(prepared));
    }

    // Completions

    /// Apply the answer to an earlier request
    pub fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Geolocated { attempt, result } => {
                match self.acquirer.resolve_geolocation(attempt, result) {
                    GeolocationOutcome::Chosen(chosen) => {
                        self.sidebar.clear_location_feedback();
                        self.choose_location(chosen);
                    }
                    GeolocationOutcome::Failed => self.sidebar.geolocate_error = true,
                    GeolocationOutcome::Stale => {}
                }
            }
            Completion::Geocoded { attempt, result } => {
                match self.acquirer.resolve_search(attempt, result) {
                    SearchOutcome::Chosen(chosen) => {
                        self.sidebar.suggestions.clear();
                        self.choose_location(chosen);
                    }
                    SearchOutcome::Suggest(candidates) => self.sidebar.suggestions = candidates,
                    SearchOutcome::Failed => self.sidebar.geocode_error = true,
                    SearchOutcome::Stale => {}
                }
            }
            Completion::ReverseGeocoded { attempt, result } => {
                match self.address.resolve(attempt, result) {
                    AddressUpdate::Set {
                        line,
                        street,
                        locality,
                    } => {
                        self.sidebar.address_text = line;
                        self.sidebar.summary_address = Some((street, locality));
                    }
                    AddressUpdate::Clear => self.sidebar.address_text.clear(),
                    AddressUpdate::Stale => {}
                }
            }
            Completion::Submitted { id, result } => self.on_submitted(id, result),
            Completion::SubFormLoaded {
                feature_type,
                result,
            } => self.on_sub_form_loaded(&feature_type, result),
        }
    }

    // Transitions

    fn choose_location(&mut self, chosen: ChosenLocation) {
        if !self.phase.is_active() {
            return;
        }
        let location = chosen.location;
        debug!(source = %chosen.source, x = location.x, y = location.y, "location chosen");

        match self.variant {
            Variant::Point => self
                .map
                .set_center_and_zoom_in(location, self.config.plot_zoom),
            Variant::Resource => self.map.set_center(location),
        }
        self.map.place_marker(location);
        self.marker.place(location);
        self.require_marker_drag();
        self.phase = Phase::CanMoveMarker;
    }

    fn require_marker_drag(&mut self) {
        if let Some(event) = self.steps.disable(self.location_step) {
            self.on_step_event(event);
        }
        self.marker.arm();
        self.map.enable_marker_moving();
        self.sidebar.prompt = Some(Prompt::MoveMarker);
        self.set_fields_enabled(false);
    }

    fn on_first_move(&mut self) {
        self.acquirer.cleanup();
        self.sidebar.clear_location_feedback();
        if matches!(self.phase, Phase::CanMoveMarker | Phase::CanPlaceMarker) {
            debug!(from = %self.phase, "marker confirmed");
            self.phase = Phase::CanAddFeature;
            self.steps.enable(self.location_step);
            self.sidebar.prompt = None;
            self.set_fields_enabled(true);
        }
    }

    fn show_street_view(&mut self, location: Location) {
        let no_imagery_text = self.config.no_street_view_text.as_deref();
        let Some(street_view) = self.street_view.as_mut() else {
            return;
        };
        self.sidebar.street_view_visible = true;
        let StreetView { provider, panel } = street_view;
        let panel = panel.get_or_insert_with(|| provider.create(location, no_imagery_text));
        panel.update(location);
    }

    fn show(&mut self, step: usize) {
        match self.steps.show(step) {
            Ok(event) => self.on_step_event(event),
            Err(e) => debug!(error = %e, "step change refused"),
        }
    }

    fn on_step_event(&mut self, event: StepEvent) {
        match event {
            StepEvent::Shown(step) => self.on_step_shown(step),
            StepEvent::AllDone => self.submit(),
        }
    }

    fn on_step_shown(&mut self, step: usize) {
        debug!(step, "step shown");
        if step == self.location_step {
            if self.sidebar.address_text.is_empty() {
                self.events.push(HostEvent::FocusAddressInput);
            }
            if self.phase == Phase::CanAddFeature
                && self.marker.location().is_some()
                && !self.marker.is_armed()
            {
                self.marker.resume();
                self.map.enable_marker_moving();
            }
        }
        if self.resource.is_some() && step == STEP_ROOF_GEOMETRY {
            self.enter_roof_step();
        }
    }

    fn enter_roof_step(&mut self) {
        self.marker.disarm();
        self.map.disable_marker_moving();
        let Some(location) = self.marker.location() else {
            return;
        };
        let ring = self
            .resource
            .as_mut()
            .and_then(|resource| resource.ensure_roof(location));
        if let Some(ring) = ring {
            debug!(points = ring.len(), "roof polygon created");
            self.map.add_editable_polygon(ring);
        }
    }

    fn set_fields_enabled(&mut self, enabled: bool) {
        self.form.set_enabled(enabled);
        self.sidebar.fields_enabled = enabled;
    }

    fn apply_sub_form(&mut self, sub_form: &SubForm) {
        self.form.replace_fields(sub_form.field_specs());
        self.refresh_details_gate();
    }

    fn refresh_details_gate(&mut self) {
        let Some(resource) = &self.resource else {
            return;
        };
        let complete = resource
            .active_sub_form()
            .is_some_and(|sub_form| sub_form.details_complete(&self.form));
        if let Some(event) = self.steps.set_next_enabled(STEP_DETAILS, complete) {
            self.on_step_event(event);
        }
    }

    fn on_sub_form_loaded(&mut self, feature_type: &str, result: Result<SubForm>) {
        let Some(resource) = self.resource.as_mut() else {
            return;
        };
        match result {
            Ok(sub_form) => {
                resource.cache_sub_form(feature_type, sub_form.clone());
                if resource.is_chosen(feature_type) && self.phase.is_active() {
                    self.apply_sub_form(&sub_form);
                }
            }
            Err(e) => warn!(feature_type, error = %e, "sub-form load failed"),
        }
    }

    fn on_submitted(
        &mut self,
        id: SubmissionId,
        result: std::result::Result<CreatedFeature, SubmitError>,
    ) {
        match self.submitter.settle(id) {
            Receipt::Unknown => debug!("response for an unknown submission"),
            Receipt::Abandoned => match result {
                Ok(created) => {
                    debug!("feature saved after the workflow was deactivated");
                    if let Some(token) = &created.geo_rev_hash {
                        self.map.update_revision_token(token);
                    }
                    self.events.push(HostEvent::SearchIndexRefresh);
                }
                Err(e) => debug!(error = %e, "abandoned submission failed"),
            },
            Receipt::Current(disposition) => match result {
                Ok(created) => self.on_saved(SubmissionResult::new(created, disposition)),
                Err(SubmitError::Validation(errors)) => self.on_validation_failed(&errors),
                Err(e) => warn!(error = %e, "submission failed"),
            },
        }
    }

    fn on_saved(&mut self, result: SubmissionResult) {
        debug!(
            feature_id = ?result.feature_id,
            enabled = result.enabled,
            disposition = %result.disposition,
            "feature saved"
        );
        if let Some(token) = &result.revision_token {
            self.map.update_revision_token(token);
        }
        self.events.push(HostEvent::SearchIndexRefresh);
        self.events.push(HostEvent::Submitted {
            feature_id: result.feature_id,
        });

        if !result.enabled {
            self.close();
            self.events.push(HostEvent::HideAddAffordance);
            return;
        }

        match result.disposition {
            Disposition::Copy => self.rearm(),
            Disposition::New => {
                self.form.clear();
                self.rearm();
            }
            Disposition::Edit => {
                let url = result
                    .feature_id
                    .map(|id| feature_edit_url(&self.config.instance_url, id));
                self.close();
                match url {
                    Some(Ok(url)) => self.events.push(HostEvent::Navigate(url)),
                    Some(Err(e)) => warn!(error = %e, "cannot build edit URL"),
                    None => warn!("saved feature has no id; cannot open its edit view"),
                }
            }
            Disposition::Close => self.close(),
        }
    }

    fn on_validation_failed(&mut self, errors: &ValidationErrors) {
        let applied = self.form.apply_errors(errors);
        debug!(fields = errors.len(), applied, "submission failed validation");
        let last = self.steps.last();
        match self.steps.show(last) {
            Ok(event) => self.on_step_event(event),
            Err(StepError::Gated { blocked_by, .. }) => {
                warn!(blocked_by, "final step gated; showing the blocking step");
                self.show(blocked_by);
            }
            Err(e) => warn!(error = %e, "cannot show validation errors"),
        }
    }

    /// Back to marker placement after a save, marker kept
    fn rearm(&mut self) {
        self.show(0);
        self.reset_resource();
        self.require_marker_drag();
        self.phase = Phase::CanPlaceMarker;
    }

    fn reset_resource(&mut self) {
        let Some(resource) = self.resource.as_mut() else {
            return;
        };
        if resource.reset() {
            self.map.remove_editable_polygon();
        }
        self.steps.disable(STEP_CHOOSE_TYPE);
        self.sidebar.summary_head = None;
        self.sidebar.summary_subhead = None;
    }

    fn close(&mut self) {
        self.teardown();
        self.events.push(HostEvent::Deactivated);
        self.events.push(HostEvent::Closed);
    }

    fn teardown(&mut self) {
        debug!(phase = %self.phase, "deactivating workflow");
        self.sidebar.nav_active = false;
        self.map.hide_marker();
        self.map.disable_marker_moving();
        self.marker.reset();
        self.acquirer.cleanup();
        self.sidebar.clear_location_feedback();
        self.address.invalidate();
        self.submitter.abandon();

        self.sidebar.address_text.clear();
        self.sidebar.summary_address = None;
        self.sidebar.prompt = None;
        self.sidebar.street_view_visible = false;
        self.form.clear();
        self.form.clear_errors();
        self.set_fields_enabled(false);
        self.reset_resource();
        self.phase = Phase::Inactive;
    }
}

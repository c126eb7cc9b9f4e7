//! Async session driving one workflow
//!
//! The controller runs on the session task; every [`Request`] it queues is
//! spawned as its own task against the shared [`Services`], and the answer is
//! applied back on the session task. Effects stay single-threaded while the
//! lookups themselves overlap.

use crate::error::{Error, Result};
use crate::form::FieldValue;
use crate::services::Services;
use crate::submit::Disposition;
use crate::types::Location;
use crate::workflow::{Completion, HostEvent, Request, WorkflowController};
use tokio::sync::mpsc;
use tracing::debug;
use url::Url;

/// A host gesture forwarded to the workflow
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Become the active mode
    Activate,
    /// Another mode took over
    Deactivate,
    /// The user cancelled
    Cancel,
    /// Change the feature collection URL
    SetSubmissionUrl(Url),
    /// Geolocate control pressed
    RequestGeolocation,
    /// Address box edited
    SetAddressText(String),
    /// Address search triggered
    SearchAddress,
    /// Geocode suggestion picked
    SelectSuggestion(usize),
    /// Map clicked
    MapClicked(Location),
    /// Marker dragged
    MarkerMoved(Location),
    /// "Next" pressed
    NextStep,
    /// "Back" pressed
    PreviousStep,
    /// Step header clicked
    ShowStep(usize),
    /// Attribute field edited
    SetField {
        /// Field name
        name: String,
        /// New value
        value: FieldValue,
    },
    /// Disposition radio changed
    SetDisposition(Disposition),
    /// Resource type chosen
    ChooseFeatureType {
        /// Type key
        key: String,
        /// Human label
        label: String,
    },
    /// Save pressed
    Submit,
}

impl Input {
    fn apply(self, controller: &mut WorkflowController) {
        match self {
            Self::Activate => controller.activate(),
            Self::Deactivate => controller.deactivate(),
            Self::Cancel => controller.cancel(),
            Self::SetSubmissionUrl(url) => controller.set_submission_url(url),
            Self::RequestGeolocation => controller.request_geolocation(),
            Self::SetAddressText(text) => controller.set_address_text(text),
            Self::SearchAddress => controller.search_address(),
            Self::SelectSuggestion(index) => controller.select_suggestion(index),
            Self::MapClicked(location) => controller.map_clicked(location),
            Self::MarkerMoved(location) => controller.marker_moved(location),
            Self::NextStep => controller.next_step(),
            Self::PreviousStep => controller.previous_step(),
            Self::ShowStep(step) => controller.show_step(step),
            Self::SetField { name, value } => controller.set_field(&name, value),
            Self::SetDisposition(disposition) => controller.set_disposition(disposition),
            Self::ChooseFeatureType { key, label } => controller.choose_feature_type(&key, &label),
            Self::Submit => controller.submit(),
        }
    }
}

/// Sends host gestures into a running [`Session`]
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inputs: mpsc::UnboundedSender<Input>,
}

impl SessionHandle {
    /// Forward a gesture
    pub fn send(&self, input: Input) -> Result<()> {
        self.inputs
            .send(input)
            .map_err(|_| Error::Internal("workflow session has stopped".to_string()))
    }
}

/// Event loop owning one workflow controller
#[derive(Debug)]
pub struct Session {
    controller: WorkflowController,
    services: Services,
    inputs: mpsc::UnboundedReceiver<Input>,
    events: mpsc::UnboundedSender<HostEvent>,
}

impl Session {
    /// Create a session plus its input handle and host-event stream
    ///
    /// A geolocator that reports no support disables the geolocate control
    /// before any input arrives.
    pub fn new(
        controller: WorkflowController,
        services: Services,
    ) -> (Self, SessionHandle, mpsc::UnboundedReceiver<HostEvent>) {
        let mut controller = controller;
        if !services.geolocator.is_supported() {
            controller.disable_geolocation();
        }
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let session = Self {
            controller,
            services,
            inputs: input_rx,
            events: event_tx,
        };
        (session, SessionHandle { inputs: input_tx }, event_rx)
    }

    /// Run until every handle is dropped and outstanding lookups have landed
    pub async fn run(mut self) -> WorkflowController {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
        let mut pending = 0usize;
        let mut inputs_open = true;

        while inputs_open || pending > 0 {
            tokio::select! {
                input = self.inputs.recv(), if inputs_open => match input {
                    Some(input) => input.apply(&mut self.controller),
                    None => {
                        debug!(pending, "input channel closed; draining");
                        inputs_open = false;
                    }
                },
                Some(completion) = done_rx.recv(), if pending > 0 => {
                    pending -= 1;
                    self.controller.complete(completion);
                }
            }

            for request in self.controller.take_requests() {
                pending += 1;
                let services = self.services.clone();
                let done = done_tx.clone();
                tokio::spawn(async move {
                    let completion = execute(&services, request).await;
                    let _ = done.send(completion);
                });
            }
            for event in self.controller.take_events() {
                debug!(%event, "host event");
                let _ = self.events.send(event);
            }
        }

        debug!("workflow session finished");
        self.controller
    }
}

async fn execute(services: &Services, request: Request) -> Completion {
    match request {
        Request::Geolocate { attempt, options } => {
            let lookup = services.geolocator.current_position(&options);
            let result = match tokio::time::timeout(options.timeout(), lookup).await {
                Ok(result) => result,
                Err(_) => Err(Error::Geolocation(format!(
                    "no position within {} ms",
                    options.timeout_ms
                ))),
            };
            Completion::Geolocated { attempt, result }
        }
        Request::ForwardGeocode { attempt, address } => Completion::Geocoded {
            attempt,
            result: services.geocoder.forward_geocode(&address).await,
        },
        Request::ReverseGeocode { attempt, location } => Completion::ReverseGeocoded {
            attempt,
            result: services.reverse_geocoder.reverse_geocode(location).await,
        },
        Request::Submit(prepared) => Completion::Submitted {
            id: prepared.id,
            result: services
                .features
                .create_feature(&prepared.url, &prepared.payload)
                .await,
        },
        Request::LoadSubForm { feature_type } => Completion::SubFormLoaded {
            result: services.sub_forms.load_sub_form(&feature_type).await,
            feature_type,
        },
    }
}

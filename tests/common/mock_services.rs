//! In-memory service doubles for session tests

use async_trait::async_trait;
use feature_placement::config::GeolocationOptions;
use feature_placement::error::{Error, Result};
use feature_placement::form::{SubForm, ValidationErrors};
use feature_placement::services::{
    FeatureEndpoint, Geocoder, Geolocator, ReverseGeocoder, Services, SubFormSource,
};
use feature_placement::submit::{CreatedFeature, SubmissionPayload, SubmitError};
use feature_placement::types::{Address, GeocodeCandidate, LonLat, Location};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Device location double
#[derive(Debug, Clone)]
pub struct StubGeolocator {
    pub supported: bool,
    pub position: Option<LonLat>,
    pub delay: Duration,
}

impl StubGeolocator {
    pub fn at(position: LonLat) -> Self {
        Self {
            supported: true,
            position: Some(position),
            delay: Duration::ZERO,
        }
    }
}

#[async_trait]
impl Geolocator for StubGeolocator {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn current_position(&self, _options: &GeolocationOptions) -> Result<LonLat> {
        tokio::time::sleep(self.delay).await;
        self.position
            .ok_or_else(|| Error::Geolocation("permission denied".to_string()))
    }
}

/// Geocoder answering from a table, with a per-address delay
#[derive(Debug, Clone, Default)]
pub struct StubGeocoder {
    answers: HashMap<String, (Duration, Vec<GeocodeCandidate>)>,
}

#[allow(dead_code)]
impl StubGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn answer(mut self, address: &str, candidates: Vec<GeocodeCandidate>) -> Self {
        self.answers
            .insert(address.to_string(), (Duration::ZERO, candidates));
        self
    }

    #[must_use]
    pub fn slow_answer(
        mut self,
        address: &str,
        delay: Duration,
        candidates: Vec<GeocodeCandidate>,
    ) -> Self {
        self.answers.insert(address.to_string(), (delay, candidates));
        self
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn forward_geocode(&self, address: &str) -> Result<Vec<GeocodeCandidate>> {
        let (delay, candidates) = self
            .answers
            .get(address)
            .cloned()
            .ok_or_else(|| Error::Geocode(format!("no answer for {address}")))?;
        tokio::time::sleep(delay).await;
        Ok(candidates)
    }
}

/// Reverse geocoder returning one fixed address (or failing)
#[derive(Debug, Clone, Default)]
pub struct StubReverseGeocoder {
    pub address: Option<Address>,
}

#[async_trait]
impl ReverseGeocoder for StubReverseGeocoder {
    async fn reverse_geocode(&self, _location: Location) -> Result<Address> {
        self.address
            .clone()
            .ok_or_else(|| Error::ReverseGeocode("no address".to_string()))
    }
}

/// Canned answer for the feature endpoint
#[derive(Debug, Clone)]
pub enum StubResponse {
    Created(CreatedFeature),
    Validation(ValidationErrors),
    Rejected(u16),
}

/// Feature endpoint that records every POST
#[derive(Debug)]
pub struct StubFeatureEndpoint {
    response: Mutex<StubResponse>,
    received: Mutex<Vec<(Url, SubmissionPayload)>>,
}

#[allow(dead_code)]
impl StubFeatureEndpoint {
    pub fn new(response: StubResponse) -> Self {
        Self {
            response: Mutex::new(response),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn set_response(&self, response: StubResponse) {
        *self.response.lock().unwrap() = response;
    }

    pub fn received(&self) -> Vec<(Url, SubmissionPayload)> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeatureEndpoint for StubFeatureEndpoint {
    async fn create_feature(
        &self,
        url: &Url,
        payload: &SubmissionPayload,
    ) -> std::result::Result<CreatedFeature, SubmitError> {
        self.received
            .lock()
            .unwrap()
            .push((url.clone(), payload.clone()));
        let response = self.response.lock().unwrap().clone();
        match response {
            StubResponse::Created(created) => Ok(created),
            StubResponse::Validation(errors) => Err(SubmitError::Validation(errors)),
            StubResponse::Rejected(status) => Err(SubmitError::Rejected { status }),
        }
    }
}

/// Sub-form source answering from a table and counting loads
#[derive(Debug, Default)]
pub struct StubSubForms {
    forms: HashMap<String, SubForm>,
    loads: AtomicUsize,
}

#[allow(dead_code)]
impl StubSubForms {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, feature_type: &str, sub_form: SubForm) -> Self {
        self.forms.insert(feature_type.to_string(), sub_form);
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubFormSource for StubSubForms {
    async fn load_sub_form(&self, feature_type: &str) -> Result<SubForm> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.forms
            .get(feature_type)
            .cloned()
            .ok_or_else(|| Error::SubForm {
                feature_type: feature_type.to_string(),
                reason: "404".to_string(),
            })
    }
}

/// Bundle the doubles into a [`Services`]
#[allow(dead_code)]
pub fn stub_services(
    geolocator: StubGeolocator,
    geocoder: StubGeocoder,
    reverse_geocoder: StubReverseGeocoder,
    features: Arc<StubFeatureEndpoint>,
    sub_forms: Arc<StubSubForms>,
) -> Services {
    Services {
        geolocator: Arc::new(geolocator),
        geocoder: Arc::new(geocoder),
        reverse_geocoder: Arc::new(reverse_geocoder),
        features,
        sub_forms,
    }
}

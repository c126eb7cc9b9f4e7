//! HTTP collaborators backed by the inventory instance

use crate::config::WorkflowConfig;
use crate::error::{Error, Result};
use crate::form::{SubForm, ValidationErrors};
use crate::services::{
    FeatureEndpoint, Geocoder, ReverseGeocoder, SubFormSource, feature_collection_url,
};
use crate::submit::{CreatedFeature, SubmissionPayload, SubmitError};
use crate::types::{Address, GeocodeCandidate, Location};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Geocoder, reverse geocoder, feature endpoint and sub-form source for one
/// instance, sharing a single reqwest client
#[derive(Debug, Clone)]
pub struct InstanceClient {
    client: Client,
    instance_url: Url,
    geocoder_url: Url,
    reverse_geocoder_url: Url,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    candidates: Vec<CandidateResponse>,
}

#[derive(Deserialize)]
struct CandidateResponse {
    address: String,
    x: f64,
    y: f64,
    #[serde(default)]
    score: Option<f64>,
}

impl CandidateResponse {
    fn into_candidate(self) -> GeocodeCandidate {
        GeocodeCandidate {
            address: self.address,
            location: Location::new(self.x, self.y),
            score: self.score,
        }
    }
}

#[derive(Deserialize)]
struct ReverseGeocodeResponse {
    address: Option<AddressResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AddressResponse {
    #[serde(rename = "Address", default)]
    street: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    postal: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FailureResponse {
    validation_errors: Option<ValidationErrors>,
}

impl InstanceClient {
    /// Create a client for the configured instance
    pub fn new(config: &WorkflowConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            instance_url: config.instance_url.clone(),
            geocoder_url: config.geocoder_url()?,
            reverse_geocoder_url: config.reverse_geocoder_url()?,
        })
    }

    /// Base URL of the instance
    pub const fn instance_url(&self) -> &Url {
        &self.instance_url
    }
}

#[async_trait]
impl Geocoder for InstanceClient {
    async fn forward_geocode(&self, address: &str) -> Result<Vec<GeocodeCandidate>> {
        debug!(address, "forward geocoding");

        let response: GeocodeResponse = self
            .client
            .get(self.geocoder_url.clone())
            .query(&[("address", address)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Geocode(e.to_string()))?
            .json()
            .await?;

        let candidates: Vec<_> = response
            .candidates
            .into_iter()
            .map(CandidateResponse::into_candidate)
            .collect();
        debug!(count = candidates.len(), "geocode candidates");
        Ok(candidates)
    }
}

#[async_trait]
impl ReverseGeocoder for InstanceClient {
    async fn reverse_geocode(&self, location: Location) -> Result<Address> {
        let lon_lat = location.to_lon_lat();
        debug!(lat = lon_lat.lat, lng = lon_lat.lon, "reverse geocoding");

        let response: ReverseGeocodeResponse = self
            .client
            .get(self.reverse_geocoder_url.clone())
            .query(&[("lat", lon_lat.lat), ("lng", lon_lat.lon)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::ReverseGeocode(e.to_string()))?
            .json()
            .await?;

        let address = response
            .address
            .ok_or_else(|| Error::ReverseGeocode("no address at this location".to_string()))?;
        Ok(Address {
            street: address.street,
            city: address.city,
            region: address.region,
            postal: address.postal,
        })
    }
}

#[async_trait]
impl FeatureEndpoint for InstanceClient {
    async fn create_feature(
        &self,
        url: &Url,
        payload: &SubmissionPayload,
    ) -> std::result::Result<CreatedFeature, SubmitError> {
        debug!(%url, fields = payload.len(), "creating feature");

        let response = self
            .client
            .post(url.clone())
            .json(payload)
            .send()
            .await
            .map_err(Error::from)?;

        let status = response.status();
        if status.is_success() {
            let created: CreatedFeature = response.json().await.map_err(Error::from)?;
            debug!(feature_id = ?created.feature_id, enabled = created.enabled, "created feature");
            return Ok(created);
        }

        let body = response.text().await.map_err(Error::from)?;
        match serde_json::from_str::<FailureResponse>(&body) {
            Ok(FailureResponse {
                validation_errors: Some(errors),
            }) => {
                debug!(status = status.as_u16(), fields = errors.len(), "validation failed");
                Err(SubmitError::Validation(errors))
            }
            _ => Err(SubmitError::Rejected {
                status: status.as_u16(),
            }),
        }
    }
}

#[async_trait]
impl SubFormSource for InstanceClient {
    async fn load_sub_form(&self, feature_type: &str) -> Result<SubForm> {
        let url = feature_collection_url(&self.instance_url, feature_type)?;
        debug!(feature_type, %url, "loading sub-form");

        let sub_form_error = |reason: String| Error::SubForm {
            feature_type: feature_type.to_string(),
            reason,
        };

        self.client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| sub_form_error(e.to_string()))?
            .error_for_status()
            .map_err(|e| sub_form_error(e.to_string()))?
            .json()
            .await
            .map_err(|e| sub_form_error(e.to_string()))
    }
}

//! Service bundle factory
//!
//! Wires the instance-backed HTTP collaborators together with the host's
//! device geolocator.

use crate::config::WorkflowConfig;
use crate::error::Result;
use crate::services::{Geolocator, InstanceClient, NoGeolocation, Services};
use std::sync::Arc;
use tracing::debug;

/// Create the services a session needs from configuration
///
/// Hosts without device location pass `None`; the bundle then reports
/// geolocation as unsupported.
pub fn create_services(
    config: &WorkflowConfig,
    geolocator: Option<Arc<dyn Geolocator>>,
) -> Result<Services> {
    let client = Arc::new(InstanceClient::new(config)?);
    let geolocator = geolocator.unwrap_or_else(|| Arc::new(NoGeolocation));
    debug!(
        instance = %config.instance_url,
        geolocation_supported = geolocator.is_supported(),
        "created services"
    );

    Ok(Services {
        geolocator,
        geocoder: client.clone(),
        reverse_geocoder: client.clone(),
        features: client.clone(),
        sub_forms: client,
    })
}

//! Workflow configuration
//!
//! Loaded from TOML; a couple of settings may be overridden through the
//! environment so a host can point the same build at another instance.

use crate::error::{Error, Result};
use crate::types::Basemap;
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default zoom level used when centring on a chosen point feature
pub const DEFAULT_PLOT_ZOOM: u8 = 18;

/// Payload key that carries the chosen location
pub const DEFAULT_GEOMETRY_KEY: &str = "plot.geom";

/// Default HTTP timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Device-location request options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeolocationOptions {
    /// Ask the device for its most precise fix
    pub high_accuracy: bool,
    /// Give up after this many milliseconds
    pub timeout_ms: u64,
    /// Maximum age of a cached fix; `0` forces a fresh reading
    pub maximum_age_ms: u64,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 5000,
            maximum_age_ms: 0,
        }
    }
}

impl GeolocationOptions {
    /// Timeout as a [`Duration`]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Maximum cached age as a [`Duration`]
    pub const fn maximum_age(&self) -> Duration {
        Duration::from_millis(self.maximum_age_ms)
    }
}

/// Configuration shared by both workflow variants
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// Base URL of the inventory instance, always ending in `/`
    pub instance_url: Url,
    /// Base map provider
    #[serde(default)]
    pub basemap: Basemap,
    /// Zoom used by the point-feature variant after a location is chosen
    #[serde(default = "default_plot_zoom")]
    pub plot_zoom: u8,
    /// Reserved payload key for the chosen location
    #[serde(default = "default_geometry_key")]
    pub geometry_key: String,
    /// Forward geocoding endpoint (defaults to `<instance>geocode`)
    #[serde(default)]
    pub geocoder_url: Option<Url>,
    /// Reverse geocoding endpoint (defaults to `<instance>geocode/reverse`)
    #[serde(default)]
    pub reverse_geocoder_url: Option<Url>,
    /// HTTP client timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Text shown by the street-view panel when no imagery exists
    #[serde(default)]
    pub no_street_view_text: Option<String>,
    /// Device-location options
    #[serde(default)]
    pub geolocation: GeolocationOptions,
}

const fn default_plot_zoom() -> u8 {
    DEFAULT_PLOT_ZOOM
}

fn default_geometry_key() -> String {
    DEFAULT_GEOMETRY_KEY.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl WorkflowConfig {
    /// Build a config with defaults for everything but the instance URL
    pub fn new(instance_url: Url) -> Self {
        Self {
            instance_url: with_trailing_slash(instance_url),
            basemap: Basemap::default(),
            plot_zoom: DEFAULT_PLOT_ZOOM,
            geometry_key: default_geometry_key(),
            geocoder_url: None,
            reverse_geocoder_url: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            no_street_view_text: None,
            geolocation: GeolocationOptions::default(),
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(text)?;
        config.instance_url = with_trailing_slash(config.instance_url);
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading workflow config");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Apply `PLACEMENT_INSTANCE_URL` and `PLACEMENT_BASEMAP` overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(raw) = env::var("PLACEMENT_INSTANCE_URL") {
            debug!("overriding instance URL from PLACEMENT_INSTANCE_URL");
            let url = Url::parse(raw.trim())
                .map_err(|e| Error::Config(format!("invalid PLACEMENT_INSTANCE_URL: {e}")))?;
            self.instance_url = with_trailing_slash(url);
        }

        if let Ok(raw) = env::var("PLACEMENT_BASEMAP") {
            debug!("overriding basemap from PLACEMENT_BASEMAP");
            self.basemap = raw.parse()?;
        }

        self.validate()
    }

    /// Forward geocoding endpoint
    pub fn geocoder_url(&self) -> Result<Url> {
        match &self.geocoder_url {
            Some(url) => Ok(url.clone()),
            None => join(&self.instance_url, "geocode"),
        }
    }

    /// Reverse geocoding endpoint
    pub fn reverse_geocoder_url(&self) -> Result<Url> {
        match &self.reverse_geocoder_url {
            Some(url) => Ok(url.clone()),
            None => join(&self.instance_url, "geocode/reverse"),
        }
    }

    /// HTTP client timeout
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.instance_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "instance_url cannot be used as a base URL: {}",
                self.instance_url
            )));
        }
        if self.geometry_key.trim().is_empty() {
            return Err(Error::Config("geometry_key must not be empty".to_string()));
        }
        Ok(())
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

pub(crate) fn join(base: &Url, path: &str) -> Result<Url> {
    base.join(path)
        .map_err(|e| Error::Config(format!("cannot join '{path}' onto {base}: {e}")))
}

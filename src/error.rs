//! Error types for feature-placement

use thiserror::Error;

/// Errors raised by services, configuration and parsing
///
/// None of these cross the workflow controller's public surface: the
/// controller folds them into sidebar indicators or log lines.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// A value could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// HTTP transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Device location lookup failed or is unsupported
    #[error("geolocation failed: {0}")]
    Geolocation(String),

    /// Forward geocoding failed
    #[error("geocoding failed: {0}")]
    Geocode(String),

    /// Reverse geocoding failed
    #[error("reverse geocoding failed: {0}")]
    ReverseGeocode(String),

    /// A per-type sub-form could not be loaded
    #[error("sub-form for '{feature_type}' could not be loaded: {reason}")]
    SubForm {
        /// Resource type key
        feature_type: String,
        /// Failure description
        reason: String,
    },

    /// Resource type key is not safe to splice into a URL
    #[error("invalid feature type: {0}")]
    InvalidFeatureType(String),

    /// Invariant violation inside the crate
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

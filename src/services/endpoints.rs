//! Instance URL derivation

use crate::config::join;
use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Resource type keys: an identifier, nothing that could escape the path
static RE_FEATURE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap());

/// Check that a resource type key is safe to splice into a URL
pub fn validate_feature_type(feature_type: &str) -> Result<&str> {
    if RE_FEATURE_TYPE.is_match(feature_type) {
        Ok(feature_type)
    } else {
        Err(Error::InvalidFeatureType(feature_type.to_string()))
    }
}

/// Collection URL for point features (`<instance>plots/`)
pub fn plots_url(instance: &Url) -> Result<Url> {
    join(instance, "plots/")
}

/// Collection URL for a resource type (`<instance>features/<type>/`)
///
/// Also where the type's sub-form is fetched from.
pub fn feature_collection_url(instance: &Url, feature_type: &str) -> Result<Url> {
    let feature_type = validate_feature_type(feature_type)?;
    join(
        instance,
        &format!("features/{}/", urlencoding::encode(feature_type)),
    )
}

/// Edit view of a saved feature (`<instance>features/<id>/edit`)
pub fn feature_edit_url(instance: &Url, feature_id: u64) -> Result<Url> {
    join(instance, &format!("features/{feature_id}/edit"))
}

//! Submission outcomes and the post-submit disposition

use crate::error::Error;
use crate::form::ValidationErrors;
use serde::Deserialize;
use thiserror::Error;

/// What the user wants to happen after a successful save
///
/// Chosen through a companion radio control; the raw control value is parsed
/// here and never travels further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    /// Add another feature, keeping the attribute values
    Copy,
    /// Add another feature with a blank form
    New,
    /// Open the saved feature's edit view
    Edit,
    /// Close the workflow
    #[default]
    Close,
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy => write!(f, "copy"),
            Self::New => write!(f, "new"),
            Self::Edit => write!(f, "edit"),
            Self::Close => write!(f, "close"),
        }
    }
}

impl std::str::FromStr for Disposition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "copy" => Ok(Self::Copy),
            "new" => Ok(Self::New),
            "edit" => Ok(Self::Edit),
            "close" => Ok(Self::Close),
            other => Err(Error::Parse(format!("unknown disposition: {other}"))),
        }
    }
}

/// Body of a 2xx response to a feature POST
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedFeature {
    /// New map revision token, when the geometry layer changed
    #[serde(default)]
    pub geo_rev_hash: Option<String>,
    /// `false` when the feature was saved but is administratively hidden
    ///
    /// A response that omits the flag counts as hidden.
    #[serde(default)]
    pub enabled: bool,
    /// Id of the saved feature
    #[serde(default)]
    pub feature_id: Option<u64>,
}

/// A successful save paired with the disposition chosen at submit time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    /// Updated map revision token
    pub revision_token: Option<String>,
    /// Whether the saved feature is visible
    pub enabled: bool,
    /// Id of the saved feature
    pub feature_id: Option<u64>,
    /// Post-submit branch
    pub disposition: Disposition,
}

impl SubmissionResult {
    /// Combine a server response with the chosen disposition
    pub fn new(created: CreatedFeature, disposition: Disposition) -> Self {
        Self {
            revision_token: created.geo_rev_hash,
            enabled: created.enabled,
            feature_id: created.feature_id,
            disposition,
        }
    }
}

/// Why a submission did not save
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The server rejected specific fields
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(ValidationErrors),

    /// Non-2xx response without a validation body
    #[error("submission rejected with status {status}")]
    Rejected {
        /// HTTP status code
        status: u16,
    },

    /// The request never completed
    #[error("submission failed: {0}")]
    Transport(#[from] Error),
}

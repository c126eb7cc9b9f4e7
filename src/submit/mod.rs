//! Feature submission
//!
//! Builds the payload for a save, tracks the one submission that may be in
//! flight, and classifies the response once it arrives:
//! 1. Prepare - serialize form + marker location into a [`SubmissionPayload`]
//! 2. Send - performed by a [`crate::services::FeatureEndpoint`]
//! 3. Settle - match the response to the submission that produced it

mod payload;
mod result;

pub use payload::{SaveHook, SubmissionPayload};
pub use result::{CreatedFeature, Disposition, SubmissionResult, SubmitError};

pub use crate::form::ValidationErrors;

use crate::form::AttributeForm;
use crate::types::Location;
use tracing::debug;
use url::Url;

/// Identifies one submit action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(u64);

/// Everything needed to send one submission
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSubmission {
    /// Submission identity, echoed back with the response
    pub id: SubmissionId,
    /// Feature collection URL to POST to
    pub url: Url,
    /// JSON body
    pub payload: SubmissionPayload,
}

/// How a response relates to the submitter's current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receipt {
    /// Response to the submission in flight; carries its disposition
    Current(Disposition),
    /// Response to a submission whose workflow was deactivated meanwhile
    Abandoned,
    /// Not a submission this submitter issued
    Unknown,
}

/// Builds payloads and tracks the in-flight submission
pub struct FeatureSubmitter {
    url: Option<Url>,
    geometry_key: String,
    before_save: Option<SaveHook>,
    issued: u64,
    in_flight: Option<(SubmissionId, Disposition)>,
    abandoned: Vec<SubmissionId>,
}

impl std::fmt::Debug for FeatureSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureSubmitter")
            .field("url", &self.url)
            .field("geometry_key", &self.geometry_key)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl FeatureSubmitter {
    /// Create a submitter posting to `url` (if already known)
    pub fn new(geometry_key: impl Into<String>, url: Option<Url>) -> Self {
        Self {
            url,
            geometry_key: geometry_key.into(),
            before_save: None,
            issued: 0,
            in_flight: None,
            abandoned: Vec::new(),
        }
    }

    /// Change the feature collection URL
    pub fn set_url(&mut self, url: Url) {
        debug!(%url, "submission URL set");
        self.url = Some(url);
    }

    /// Feature collection URL, if set
    pub const fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Install a before-save hook
    pub fn set_before_save(&mut self, hook: SaveHook) {
        self.before_save = Some(hook);
    }

    /// Whether a submission is awaiting its response
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Prepare a submission, or `None` if one is in flight or no URL is set
    pub fn prepare(
        &mut self,
        form: &AttributeForm,
        location: Location,
        disposition: Disposition,
    ) -> Option<PreparedSubmission> {
        if self.in_flight.is_some() {
            debug!("submission already in flight");
            return None;
        }
        let url = self.url.clone()?;

        self.issued += 1;
        let id = SubmissionId(self.issued);
        let payload = SubmissionPayload::build(
            form,
            &self.geometry_key,
            location,
            self.before_save.as_ref(),
        );
        debug!(id = id.0, %url, fields = payload.len(), %disposition, "prepared submission");
        self.in_flight = Some((id, disposition));
        Some(PreparedSubmission { id, url, payload })
    }

    /// Match a response to the submission that produced it
    pub fn settle(&mut self, id: SubmissionId) -> Receipt {
        match self.in_flight {
            Some((current, disposition)) if current == id => {
                self.in_flight = None;
                Receipt::Current(disposition)
            }
            _ => {
                if let Some(pos) = self.abandoned.iter().position(|a| *a == id) {
                    self.abandoned.swap_remove(pos);
                    Receipt::Abandoned
                } else {
                    Receipt::Unknown
                }
            }
        }
    }

    /// Forget the in-flight submission; its response will settle as abandoned
    pub fn abandon(&mut self) {
        if let Some((id, _)) = self.in_flight.take() {
            debug!(id = id.0, "abandoning in-flight submission");
            self.abandoned.push(id);
        }
    }
}

//! Messages crossing the controller boundary
//!
//! The controller never performs I/O. It queues [`Request`]s for the session
//! to execute, takes their [`Completion`]s back, and queues [`HostEvent`]s
//! for the hosting page.

use crate::config::GeolocationOptions;
use crate::error::Result;
use crate::form::SubForm;
use crate::submit::{CreatedFeature, PreparedSubmission, SubmissionId, SubmitError};
use crate::types::{Address, GeocodeCandidate, LonLat, Location};
use crate::workflow::location::Attempt;
use url::Url;

/// Signals for the hosting page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Workflow became active; lock the exit prompt
    Activated,
    /// Workflow went inactive (cancel, close or external deactivate)
    Deactivated,
    /// Workflow closed itself; the host should leave this mode
    Closed,
    /// A feature was saved
    Submitted {
        /// Id of the saved feature
        feature_id: Option<u64>,
    },
    /// Search results may be out of date
    SearchIndexRefresh,
    /// Leave the page for this URL
    Navigate(Url),
    /// Hide the page-level "add" affordance
    HideAddAffordance,
    /// Put keyboard focus in the address box
    FocusAddressInput,
}

impl std::fmt::Display for HostEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Activated => write!(f, "activated"),
            Self::Deactivated => write!(f, "deactivated"),
            Self::Closed => write!(f, "closed"),
            Self::Submitted {
                feature_id: Some(id),
            } => write!(f, "submitted feature {id}"),
            Self::Submitted { feature_id: None } => write!(f, "submitted"),
            Self::SearchIndexRefresh => write!(f, "search index refresh"),
            Self::Navigate(url) => write!(f, "navigate to {url}"),
            Self::HideAddAffordance => write!(f, "hide add affordance"),
            Self::FocusAddressInput => write!(f, "focus address input"),
        }
    }
}

/// Asynchronous work the controller wants done
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Read the device location
    Geolocate {
        /// Generation stamp
        attempt: Attempt,
        /// Device options
        options: GeolocationOptions,
    },
    /// Look up address text
    ForwardGeocode {
        /// Generation stamp
        attempt: Attempt,
        /// Address text
        address: String,
    },
    /// Look up the address at the marker
    ReverseGeocode {
        /// Generation stamp
        attempt: Attempt,
        /// Marker location
        location: Location,
    },
    /// POST a feature
    Submit(PreparedSubmission),
    /// Fetch a resource type's sub-form
    LoadSubForm {
        /// Resource type key
        feature_type: String,
    },
}

/// The answer to a [`Request`]
#[derive(Debug)]
pub enum Completion {
    /// Device location answered
    Geolocated {
        /// Stamp of the request
        attempt: Attempt,
        /// Position or failure
        result: Result<LonLat>,
    },
    /// Forward geocode answered
    Geocoded {
        /// Stamp of the request
        attempt: Attempt,
        /// Candidates or failure
        result: Result<Vec<GeocodeCandidate>>,
    },
    /// Reverse geocode answered
    ReverseGeocoded {
        /// Stamp of the request
        attempt: Attempt,
        /// Address or failure
        result: Result<Address>,
    },
    /// Feature POST answered
    Submitted {
        /// Submission the response belongs to
        id: SubmissionId,
        /// Saved feature or failure
        result: std::result::Result<CreatedFeature, SubmitError>,
    },
    /// Sub-form load answered
    SubFormLoaded {
        /// Resource type key
        feature_type: String,
        /// Schema or failure
        result: Result<SubForm>,
    },
}

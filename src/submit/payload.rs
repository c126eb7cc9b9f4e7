//! Submission payload assembly

use crate::form::{AttributeForm, FormData};
use crate::types::Location;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Host hook run on the serialized form before the geometry is injected
pub type SaveHook = Arc<dyn Fn(&mut FormData) + Send + Sync>;

/// JSON body of a feature POST
///
/// Never contains a null value: blank fields are omitted so the server applies
/// its defaults, and an all-blank form yields a payload holding only the
/// geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SubmissionPayload(FormData);

impl SubmissionPayload {
    /// Build the payload from the form and the marker location
    pub fn build(
        form: &AttributeForm,
        geometry_key: &str,
        location: Location,
        before_save: Option<&SaveHook>,
    ) -> Self {
        let mut data = form.serialize();
        if let Some(hook) = before_save {
            hook(&mut data);
        }
        data.insert(
            geometry_key.to_string(),
            serde_json::json!({ "x": location.x, "y": location.y }),
        );
        data.retain(|_, value| !value.is_null());
        Self(data)
    }

    /// Value for a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Underlying mapping
    pub const fn as_map(&self) -> &FormData {
        &self.0
    }
}

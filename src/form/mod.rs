//! Attribute form model
//!
//! Holds the edit fields of the feature being added and turns them into the
//! key/value mapping that becomes the submission payload. A field the user
//! left blank is never serialized, whatever its type, so the server can apply
//! its own default.

mod subform;

pub use subform::{Question, SubForm};

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Serialized form state: field name to JSON value
pub type FormData = BTreeMap<String, Value>;

/// Server-side validation messages keyed by field name
pub type ValidationErrors = BTreeMap<String, Vec<String>>;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepted input spellings for date fields
const DATE_INPUTS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Accepted input spellings for datetime fields
const DATETIME_INPUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Data type of an edit field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text
    #[default]
    String,
    /// One of a fixed set of options
    Choice,
    /// Integer
    Int,
    /// Decimal number
    Float,
    /// Calendar date
    Date,
    /// Date and time
    Datetime,
    /// Yes / no (checkbox or True/False radio pair)
    Bool,
    /// Id of another record, usually chosen through a typeahead
    ForeignKey,
}

/// Declares one edit field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Qualified name, e.g. `tree.diameter`
    pub name: String,
    /// Data type
    #[serde(default)]
    pub kind: FieldKind,
    /// Human label
    #[serde(default)]
    pub label: Option<String>,
}

impl FieldSpec {
    /// Declare a field without a label
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
        }
    }
}

/// Current value of an edit field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    /// Left blank
    #[default]
    Unset,
    /// Raw text as typed or selected
    Text(String),
    /// Checked / unchecked, or the True / False radio answer
    Flag(bool),
}

impl FieldValue {
    /// Text value; whitespace-only text counts as blank
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::Unset
        } else {
            Self::Text(value)
        }
    }

    /// Whether the user has left this field blank
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Boolean answer, if this is one
    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// One edit field with its value and server-side errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Declaration
    pub spec: FieldSpec,
    /// Current value
    pub value: FieldValue,
    /// Validation messages from the last failed submission
    pub errors: Vec<String>,
}

/// The set of edit fields belonging to one workflow
#[derive(Debug, Clone, Default)]
pub struct AttributeForm {
    fields: Vec<FormField>,
    enabled: bool,
}

impl AttributeForm {
    /// Build a form from field declarations, all blank and disabled
    pub fn new(specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        let mut form = Self::default();
        form.replace_fields(specs);
        form
    }

    /// Swap in a different set of fields (e.g. a freshly loaded sub-form)
    ///
    /// A field whose name and kind survive the swap keeps its value, so a
    /// copied form stays filled when the same sub-form is applied again.
    /// Server errors never carry over.
    pub fn replace_fields(&mut self, specs: impl IntoIterator<Item = FieldSpec>) {
        let mut previous = std::mem::take(&mut self.fields);
        self.fields = specs
            .into_iter()
            .map(|spec| {
                let value = previous
                    .iter_mut()
                    .find(|f| f.spec.name == spec.name && f.spec.kind == spec.kind)
                    .map(|f| std::mem::take(&mut f.value))
                    .unwrap_or_default();
                FormField {
                    spec,
                    value,
                    errors: Vec::new(),
                }
            })
            .collect();
    }

    /// All fields in declaration order
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.spec.name == name)
    }

    /// Current value of a field
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.field(name).map(|f| &f.value)
    }

    /// Set a field's value
    ///
    /// Boolean fields accept `"True"` / `"False"` text as produced by radio
    /// controls.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<()> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.spec.name == name)
            .ok_or_else(|| Error::Parse(format!("unknown form field: {name}")))?;

        field.value = match (field.spec.kind, value) {
            (FieldKind::Bool, FieldValue::Text(text)) => FieldValue::Flag(
                parse_flag(&text)
                    .ok_or_else(|| Error::Parse(format!("'{text}' is not a yes/no answer")))?,
            ),
            (_, value) => value,
        };
        Ok(())
    }

    /// Whether a field holds a non-blank answer
    pub fn is_answered(&self, name: &str) -> bool {
        self.value(name).is_some_and(|v| !v.is_blank())
    }

    /// Reset every field to blank (text emptied, checkboxes unchecked)
    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.value = FieldValue::Unset;
        }
    }

    /// Whether the user may edit the fields
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable editing
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Attach validation messages to the named fields
    ///
    /// Returns how many fields received messages; names that match no field
    /// are dropped.
    pub fn apply_errors(&mut self, errors: &ValidationErrors) -> usize {
        let mut applied = 0;
        for (name, messages) in errors {
            match self.fields.iter_mut().find(|f| &f.spec.name == name) {
                Some(field) => {
                    field.errors.clone_from(messages);
                    applied += 1;
                }
                None => debug!(field = %name, "validation error for unknown field"),
            }
        }
        applied
    }

    /// Hide all validation messages
    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.errors.clear();
        }
    }

    /// Validation messages for a field
    pub fn errors(&self, name: &str) -> &[String] {
        self.field(name).map_or(&[], |f| f.errors.as_slice())
    }

    /// Whether any field shows validation messages
    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| !f.errors.is_empty())
    }

    /// Serialize non-blank fields into a key/value mapping
    pub fn serialize(&self) -> FormData {
        self.fields
            .iter()
            .filter_map(|f| serialize_value(f.spec.kind, &f.value).map(|v| (f.spec.name.clone(), v)))
            .collect()
    }
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn serialize_value(kind: FieldKind, value: &FieldValue) -> Option<Value> {
    let text = match value {
        FieldValue::Unset => return None,
        FieldValue::Flag(flag) => return Some(Value::Bool(*flag)),
        FieldValue::Text(text) if text.trim().is_empty() => return None,
        FieldValue::Text(text) => text,
    };

    // Values that don't parse go through verbatim so the server reports them
    let verbatim = || Value::String(text.clone());
    let trimmed = text.trim();

    Some(match kind {
        FieldKind::String | FieldKind::Choice => verbatim(),
        FieldKind::Int | FieldKind::ForeignKey => trimmed
            .parse::<i64>()
            .map_or_else(|_| verbatim(), Value::from),
        FieldKind::Float => trimmed
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map_or_else(verbatim, Value::Number),
        FieldKind::Date => parse_date(trimmed)
            .map_or_else(verbatim, |d| Value::String(d.format(DATE_FORMAT).to_string())),
        FieldKind::Datetime => parse_datetime(trimmed)
            .map_or_else(verbatim, |d| Value::String(d.format(DATETIME_FORMAT).to_string())),
        FieldKind::Bool => parse_flag(trimmed).map_or_else(verbatim, Value::Bool),
    })
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_INPUTS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    DATETIME_INPUTS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| parse_date(text).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree_form() -> AttributeForm {
        AttributeForm::new([
            FieldSpec::new("tree.species", FieldKind::ForeignKey),
            FieldSpec::new("tree.diameter", FieldKind::Float),
            FieldSpec::new("tree.height", FieldKind::Int),
            FieldSpec::new("tree.date_planted", FieldKind::Date),
            FieldSpec::new("tree.readonly", FieldKind::Bool),
            FieldSpec::new("plot.address_street", FieldKind::String),
            FieldSpec::new("plot.last_inspected", FieldKind::Datetime),
        ])
    }

    #[test]
    fn test_replace_fields_keeps_matching_values() {
        let mut form = tree_form();
        form.set("tree.height", "30".into()).unwrap();
        form.set("tree.diameter", "12.5".into()).unwrap();
        form.set("plot.address_street", "100 Main St".into()).unwrap();

        form.replace_fields([
            FieldSpec::new("tree.height", FieldKind::Int),
            FieldSpec::new("tree.diameter", FieldKind::String),
            FieldSpec::new("tree.note", FieldKind::String),
        ]);

        assert_eq!(form.fields().len(), 3);
        assert!(form.is_answered("tree.height"));
        assert!(!form.is_answered("tree.diameter"));
        assert!(!form.is_answered("tree.note"));
        assert!(form.field("plot.address_street").is_none());
        assert_eq!(form.serialize()["tree.height"], json!(30));
    }

    #[test]
    fn test_blank_form_serializes_empty() {
        assert!(tree_form().serialize().is_empty());
    }

    #[test]
    fn test_whitespace_counts_as_blank() {
        let mut form = tree_form();
        form.set("plot.address_street", FieldValue::Text("   ".to_string()))
            .unwrap();
        form.set("tree.diameter", "".into()).unwrap();
        assert!(form.serialize().is_empty());
        assert!(!form.is_answered("plot.address_street"));
    }

    #[test]
    fn test_typed_serialization() {
        let mut form = tree_form();
        form.set("tree.species", "42".into()).unwrap();
        form.set("tree.diameter", "12.5".into()).unwrap();
        form.set("tree.height", "30".into()).unwrap();
        form.set("tree.date_planted", "04/15/2014".into()).unwrap();
        form.set("tree.readonly", false.into()).unwrap();
        form.set("plot.address_street", "100 Main St".into()).unwrap();
        form.set("plot.last_inspected", "2014-04-15T09:30:00".into())
            .unwrap();

        let data = form.serialize();
        assert_eq!(data["tree.species"], json!(42));
        assert_eq!(data["tree.diameter"], json!(12.5));
        assert_eq!(data["tree.height"], json!(30));
        assert_eq!(data["tree.date_planted"], json!("2014-04-15"));
        assert_eq!(data["tree.readonly"], json!(false));
        assert_eq!(data["plot.address_street"], json!("100 Main St"));
        assert_eq!(data["plot.last_inspected"], json!("2014-04-15 09:30:00"));
    }

    #[test]
    fn test_unparseable_number_sent_verbatim() {
        let mut form = tree_form();
        form.set("tree.height", "tall".into()).unwrap();
        assert_eq!(form.serialize()["tree.height"], json!("tall"));
    }

    #[test]
    fn test_bool_accepts_radio_text() {
        let mut form = tree_form();
        form.set("tree.readonly", "True".into()).unwrap();
        assert_eq!(form.value("tree.readonly"), Some(&FieldValue::Flag(true)));
        assert!(form.set("tree.readonly", "maybe".into()).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut form = tree_form();
        assert!(matches!(
            form.set("tree.nope", "1".into()),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_clear_resets_values() {
        let mut form = tree_form();
        form.set("tree.height", "30".into()).unwrap();
        form.set("tree.readonly", true.into()).unwrap();
        form.clear();
        assert!(form.fields().iter().all(|f| f.value.is_blank()));
    }

    #[test]
    fn test_errors_attach_and_clear() {
        let mut form = tree_form();
        let mut errors = ValidationErrors::new();
        errors.insert("tree.diameter".to_string(), vec!["must be positive".to_string()]);
        errors.insert("tree.ghost".to_string(), vec!["ignored".to_string()]);

        assert_eq!(form.apply_errors(&errors), 1);
        assert_eq!(form.errors("tree.diameter"), ["must be positive"]);
        assert!(form.errors("tree.ghost").is_empty());
        assert!(form.has_errors());

        form.clear_errors();
        assert!(!form.has_errors());
    }

    #[test]
    fn test_field_kind_deserializes_snake_case() {
        let spec: FieldSpec =
            serde_json::from_value(json!({"name": "resource.owner", "kind": "foreign_key"}))
                .unwrap();
        assert_eq!(spec.kind, FieldKind::ForeignKey);
        let spec: FieldSpec = serde_json::from_value(json!({"name": "resource.note"})).unwrap();
        assert_eq!(spec.kind, FieldKind::String);
    }
}

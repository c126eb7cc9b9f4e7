//! Per-type sub-forms for mapped resources
//!
//! Each resource type carries its own attribute fields plus a tree of yes/no
//! questions. A sub-question is only shown once its parent question has been
//! answered "yes"; the details step is complete when every shown question has
//! a non-blank answer.

use super::{AttributeForm, FieldSpec, FieldValue};
use serde::Deserialize;

/// One question, possibly with follow-ups revealed by a "yes" answer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    /// Field holding the answer
    pub field: FieldSpec,
    /// Follow-up questions shown when `field` is answered `true`
    #[serde(default)]
    pub subquestions: Vec<Question>,
}

/// Schema fragment loaded for one resource type
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SubForm {
    /// Plain attribute fields
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    /// Top-level questions
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl SubForm {
    /// Every field declared by the sub-form, questions included
    pub fn field_specs(&self) -> Vec<FieldSpec> {
        let mut specs = self.fields.clone();
        let mut stack: Vec<&Question> = self.questions.iter().rev().collect();
        while let Some(question) = stack.pop() {
            specs.push(question.field.clone());
            stack.extend(question.subquestions.iter().rev());
        }
        specs
    }

    /// Names of the questions currently shown, in display order
    pub fn visible_questions<'a>(&'a self, form: &AttributeForm) -> Vec<&'a str> {
        let mut visible = Vec::new();
        let mut stack: Vec<&Question> = self.questions.iter().rev().collect();
        while let Some(question) = stack.pop() {
            visible.push(question.field.name.as_str());
            if form.value(&question.field.name) == Some(&FieldValue::Flag(true)) {
                stack.extend(question.subquestions.iter().rev());
            }
        }
        visible
    }

    /// Whether every shown question has an answer
    pub fn details_complete(&self, form: &AttributeForm) -> bool {
        self.visible_questions(form)
            .into_iter()
            .all(|name| form.is_answered(name))
    }
}

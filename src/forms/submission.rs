//! Consumption side of a form definition: seeding answers, evaluating
//! visibility, and validating a submission before it is sent.

use crate::forms::definition::{Answers, AnswerValue, FieldErrors, FieldKind, FormDefinition};

/// Wording for a missing required answer
pub const REQUIRED_MESSAGE: &str = "Ce champ est requis";

/// Default answers for every field of the definition: `false` for
/// checkboxes, the empty string otherwise. Populated at form-open time so
/// visibility rules always have something to compare against.
pub fn default_answers(definition: &FormDefinition) -> Answers {
    definition
        .fields
        .iter()
        .map(|field| {
            let value = match field.kind {
                FieldKind::Checkbox => AnswerValue::Flag(false),
                _ => AnswerValue::Text(String::new()),
            };
            (field.id.clone(), value)
        })
        .collect()
}

/// Validate answers against the definition.
///
/// Only *visible* required fields are checked: a checkbox must be truthy,
/// anything else must be non-empty after trimming. Hidden fields are
/// never blocking, whatever their answers hold. The server remains the
/// authority for capacity and uniqueness constraints.
pub fn validate_submission(definition: &FormDefinition, answers: &Answers) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field in &definition.fields {
        if !definition.is_visible(field, answers) || !field.required {
            continue;
        }
        let answer = answers.get(&field.id);
        let missing = match field.kind {
            FieldKind::Checkbox => !answer.is_some_and(AnswerValue::is_truthy),
            _ => answer
                .map(|v| v.stringify().trim().is_empty())
                .unwrap_or(true),
        };
        if missing {
            errors.insert(field.id.clone(), REQUIRED_MESSAGE.to_string());
        }
    }
    errors
}

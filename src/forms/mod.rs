//! Dynamic form definitions: the versioned JSON model, the authoring
//! state machine, and submission-side validation.

mod builder;
mod definition;
mod submission;

pub use builder::{slugify, validate_definition, FormBuilder, MoveDirection};
pub use definition::{
    AnswerValue, Answers, FieldErrors, FieldKind, FormDefinition, FormField, VisibilityRule,
    DEFINITION_VERSION,
};
pub use submission::{default_answers, validate_submission, REQUIRED_MESSAGE};

//! The versioned JSON definition of a user-configurable form.
//!
//! Wire format (consumed by the mobile clients as-is):
//!
//! ```json
//! {
//!   "version": 1,
//!   "fields": [
//!     { "id": "prenom", "type": "text", "label": "Prénom", "required": true,
//!       "placeholder": "", "visibleWhen": null },
//!     { "id": "regime", "type": "select", "options": ["Aucun", "Végétarien"],
//!       "label": "Régime", "required": false,
//!       "visibleWhen": { "fieldId": "cantine", "operator": "equals", "value": "oui" } }
//!   ]
//! }
//! ```
//!
//! Field ids are unique within a definition and are the keys under which
//! submitted answers are stored; they must stay stable across edits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Current definition schema version
pub const DEFINITION_VERSION: u32 = 1;

fn default_version() -> u32 {
    DEFINITION_VERSION
}

/// A complete form definition: an ordered sequence of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Ordered fields
    #[serde(default)]
    pub fields: Vec<FormField>,
}

impl Default for FormDefinition {
    fn default() -> Self {
        Self {
            version: DEFINITION_VERSION,
            fields: Vec::new(),
        }
    }
}

impl FormDefinition {
    /// Leniently coerce an arbitrary JSON value into a definition.
    ///
    /// Server rows predating the builder occasionally carry `null` or a
    /// malformed blob; those degrade to an empty definition rather than
    /// failing the whole record.
    pub fn from_value(value: &serde_json::Value) -> FormDefinition {
        if !value.is_object() {
            return FormDefinition::default();
        }
        match serde_json::from_value(value.clone()) {
            Ok(def) => def,
            Err(err) => {
                log::warn!("unparsable form definition, using empty: {err}");
                FormDefinition::default()
            }
        }
    }

    /// Find a field by id
    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Whether `field` is visible given the current answers.
    ///
    /// No rule means always visible. A rule whose target field no longer
    /// exists in this definition is a dangling reference and degrades to
    /// always visible.
    pub fn is_visible(&self, field: &FormField, answers: &Answers) -> bool {
        match &field.visible_when {
            None => true,
            Some(rule) => {
                if self.field(rule.field_id()).is_none() {
                    return true;
                }
                rule.matches(answers)
            }
        }
    }
}

/// One field of a form definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    /// Unique, stable identifier; the answer key and visibility target
    pub id: String,
    /// The field kind and its kind-specific constraints
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Display label
    #[serde(default)]
    pub label: String,
    /// Whether an answer is mandatory (when the field is visible)
    #[serde(default)]
    pub required: bool,
    /// Input placeholder
    #[serde(default)]
    pub placeholder: String,
    /// Conditional visibility; `None` means always visible
    #[serde(rename = "visibleWhen", default)]
    pub visible_when: Option<VisibilityRule>,
}

/// The supported field kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line text
    Text,
    /// Multi-line text
    Textarea,
    /// Numeric input
    Number,
    /// Choice among fixed options
    Select {
        /// The selectable options
        #[serde(default)]
        options: Vec<String>,
    },
    /// Boolean checkbox
    Checkbox,
    /// Calendar date
    Date,
}

impl FieldKind {
    /// French display label, as shown in the builder and public page
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Text => "Texte",
            FieldKind::Textarea => "Paragraphe",
            FieldKind::Number => "Nombre",
            FieldKind::Select { .. } => "Liste",
            FieldKind::Checkbox => "Case à cocher",
            FieldKind::Date => "Date",
        }
    }
}

/// A field visibility condition.
///
/// `equals` is the only supported operator; the operator tag makes the
/// set exhaustive and extensible without stringly-typed branching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operator", rename_all = "lowercase")]
pub enum VisibilityRule {
    /// Visible iff the target field's answer stringifies equal to `value`
    Equals {
        /// The id of the field whose answer is tested
        #[serde(rename = "fieldId")]
        field_id: String,
        /// The expected value
        value: serde_json::Value,
    },
}

impl VisibilityRule {
    /// The id of the field this rule watches
    pub fn field_id(&self) -> &str {
        match self {
            VisibilityRule::Equals { field_id, .. } => field_id,
        }
    }

    /// Point the rule at a different field id (reference repair)
    pub(crate) fn retarget(&mut self, new_id: &str) {
        match self {
            VisibilityRule::Equals { field_id, .. } => *field_id = new_id.to_string(),
        }
    }

    /// Evaluate the rule against the current answers
    pub fn matches(&self, answers: &Answers) -> bool {
        match self {
            VisibilityRule::Equals { field_id, value } => {
                let left = answers
                    .get(field_id)
                    .map(AnswerValue::stringify)
                    .unwrap_or_default();
                left == stringify_json(value)
            }
        }
    }
}

/// A submitted answer value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Checkbox state
    Flag(bool),
    /// Numeric answer
    Number(f64),
    /// Text answer
    Text(String),
    /// Absent answer
    Null,
}

impl AnswerValue {
    /// String form used for visibility comparison and emptiness checks
    pub fn stringify(&self) -> String {
        match self {
            AnswerValue::Flag(b) => b.to_string(),
            AnswerValue::Number(n) => n.to_string(),
            AnswerValue::Text(s) => s.clone(),
            AnswerValue::Null => String::new(),
        }
    }

    /// Checkbox truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            AnswerValue::Flag(b) => *b,
            AnswerValue::Number(n) => *n != 0.0,
            AnswerValue::Text(s) => !s.is_empty(),
            AnswerValue::Null => false,
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Flag(value)
    }
}

/// Submitted answers, keyed by field id
pub type Answers = BTreeMap<String, AnswerValue>;

fn stringify_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Per-field validation errors, keyed by field id (or `definition` for
/// authoring-level errors)
pub type FieldErrors = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_the_wire_format() {
        let raw = json!({
            "version": 1,
            "fields": [
                {
                    "id": "cantine",
                    "type": "checkbox",
                    "label": "Cantine",
                    "required": false,
                    "placeholder": "",
                    "visibleWhen": null
                },
                {
                    "id": "regime",
                    "type": "select",
                    "options": ["Aucun", "Végétarien"],
                    "label": "Régime",
                    "required": true,
                    "placeholder": "",
                    "visibleWhen": { "fieldId": "cantine", "operator": "equals", "value": "true" }
                }
            ]
        });

        let def: FormDefinition = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(def.version, 1);
        assert_eq!(def.fields.len(), 2);
        assert_eq!(
            def.fields[1].kind,
            FieldKind::Select {
                options: vec!["Aucun".to_string(), "Végétarien".to_string()]
            }
        );
        assert_eq!(
            def.fields[1].visible_when.as_ref().map(|r| r.field_id()),
            Some("cantine")
        );

        let back = serde_json::to_value(&def).unwrap();
        assert_eq!(back["fields"][0]["type"], "checkbox");
        assert_eq!(back["fields"][1]["options"], json!(["Aucun", "Végétarien"]));
        assert_eq!(back["fields"][1]["visibleWhen"]["operator"], "equals");
    }

    #[test]
    fn lenient_parse_degrades_to_empty() {
        assert_eq!(FormDefinition::from_value(&json!(null)), FormDefinition::default());
        assert_eq!(FormDefinition::from_value(&json!([1, 2])), FormDefinition::default());
        let def = FormDefinition::from_value(&json!({ "fields": [] }));
        assert_eq!(def.version, 1);
    }

    #[test]
    fn visibility_rule_compares_stringified() {
        let rule = VisibilityRule::Equals {
            field_id: "age".to_string(),
            value: json!(18),
        };
        let mut answers = Answers::new();
        answers.insert("age".to_string(), AnswerValue::Number(18.0));
        assert!(rule.matches(&answers));

        answers.insert("age".to_string(), AnswerValue::Text("18".to_string()));
        assert!(rule.matches(&answers));

        answers.insert("age".to_string(), AnswerValue::Text("17".to_string()));
        assert!(!rule.matches(&answers));
    }

    #[test]
    fn dangling_reference_is_always_visible() {
        let def: FormDefinition = serde_json::from_value(json!({
            "version": 1,
            "fields": [
                {
                    "id": "y",
                    "type": "text",
                    "label": "Y",
                    "visibleWhen": { "fieldId": "ghost", "operator": "equals", "value": "oui" }
                }
            ]
        }))
        .unwrap();

        let field = def.field("y").unwrap();
        assert!(def.is_visible(field, &Answers::new()));
    }
}

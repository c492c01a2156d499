//! Authoring operations for form definitions.
//!
//! A [`FormBuilder`] wraps a definition plus the currently selected field
//! and implements the structural edits of the admin builder: add, move,
//! duplicate, delete, rename with reference repair. All operations keep
//! the definition's invariants: ids stay unique, and no visibility rule
//! is left pointing at a removed or renamed field.

use crate::forms::definition::{FieldErrors, FieldKind, FormDefinition, FormField};
use crate::query::normalize_text;

/// Turn free text into a URL/id-safe slug ("Café de l'été" -> "cafe-de-l-ete").
pub fn slugify(value: &str) -> String {
    let normalized = normalize_text(value);
    let mut slug = String::with_capacity(normalized.len());
    let mut last_dash = true;
    for c in normalized.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Direction for [`FormBuilder::move_field`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Towards the start of the form
    Up,
    /// Towards the end of the form
    Down,
}

/// A form definition under edition, with the builder's field selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormBuilder {
    /// The definition being edited
    pub definition: FormDefinition,
    selected: Option<String>,
}

impl FormBuilder {
    /// Wrap an existing definition
    pub fn new(definition: FormDefinition) -> Self {
        Self {
            definition,
            selected: None,
        }
    }

    /// The currently selected field id
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The currently selected field
    pub fn selected_field(&self) -> Option<&FormField> {
        self.selected
            .as_deref()
            .and_then(|id| self.definition.field(id))
    }

    /// Select a field by id; selecting an unknown id clears the selection
    pub fn select(&mut self, id: Option<&str>) {
        self.selected = id
            .filter(|id| self.definition.field(id).is_some())
            .map(str::to_string);
    }

    fn unique_id(&self, base: &str) -> String {
        let base = if base.is_empty() { "champ" } else { base };
        let taken: Vec<&str> = self.definition.fields.iter().map(|f| f.id.as_str()).collect();
        if !taken.contains(&base) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if !taken.contains(&candidate.as_str()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Append a new field of `kind` with an auto-generated unique id and
    /// type-appropriate defaults, and select it. Returns the new id.
    pub fn add_field(&mut self, kind: FieldKind) -> String {
        let kind = match kind {
            FieldKind::Select { options } if options.is_empty() => FieldKind::Select {
                options: vec!["Option 1".to_string(), "Option 2".to_string()],
            },
            other => other,
        };

        let base = slugify(&format!("champ-{}", self.definition.fields.len() + 1));
        let id = self.unique_id(&base);
        self.definition.fields.push(FormField {
            id: id.clone(),
            kind,
            label: "Nouveau champ".to_string(),
            required: false,
            placeholder: String::new(),
            visible_when: None,
        });
        self.selected = Some(id.clone());
        id
    }

    /// Patch a field in place
    pub fn update_field<F: FnOnce(&mut FormField)>(&mut self, id: &str, patch: F) -> bool {
        match self.definition.fields.iter_mut().find(|f| f.id == id) {
            Some(field) => {
                patch(field);
                true
            }
            None => false,
        }
    }

    /// Swap a field with its immediate neighbor. No-op at either boundary.
    pub fn move_field(&mut self, id: &str, direction: MoveDirection) -> bool {
        let Some(idx) = self.definition.fields.iter().position(|f| f.id == id) else {
            return false;
        };
        let swap = match direction {
            MoveDirection::Up => {
                if idx == 0 {
                    return false;
                }
                idx - 1
            }
            MoveDirection::Down => {
                if idx + 1 >= self.definition.fields.len() {
                    return false;
                }
                idx + 1
            }
        };
        self.definition.fields.swap(idx, swap);
        true
    }

    /// Insert a copy of the field right after the original, with a
    /// disambiguated id and a "(copie)" label suffix, and select it.
    pub fn duplicate_field(&mut self, id: &str) -> Option<String> {
        let idx = self.definition.fields.iter().position(|f| f.id == id)?;
        let original = self.definition.fields[idx].clone();

        let new_id = self.unique_id(&format!("{id}-copy"));
        let label = if original.label.is_empty() {
            "Champ".to_string()
        } else {
            original.label.clone()
        };
        let copy = FormField {
            id: new_id.clone(),
            label: format!("{label} (copie)"),
            ..original
        };
        self.definition.fields.insert(idx + 1, copy);
        self.selected = Some(new_id.clone());
        Some(new_id)
    }

    /// Remove a field, null out every visibility rule that referenced it,
    /// and re-select the nearest surviving neighbor when the deleted field
    /// was the selected one.
    pub fn delete_field(&mut self, id: &str) -> bool {
        let Some(idx) = self.definition.fields.iter().position(|f| f.id == id) else {
            return false;
        };
        self.definition.fields.remove(idx);

        for field in &mut self.definition.fields {
            if field
                .visible_when
                .as_ref()
                .is_some_and(|rule| rule.field_id() == id)
            {
                field.visible_when = None;
            }
        }

        if self.selected.as_deref() == Some(id) {
            let neighbor = self
                .definition
                .fields
                .get(idx)
                .or_else(|| self.definition.fields.last());
            self.selected = neighbor.map(|f| f.id.clone());
        }
        true
    }

    /// Rename a field id, propagating the new id to every visibility rule
    /// that referenced the old one. The rename is rejected (no-op,
    /// `false`) when the slugified new id is empty, unchanged, or
    /// collides with an existing field.
    pub fn rename_field(&mut self, old_id: &str, new_id: &str) -> bool {
        let slug = slugify(new_id);
        let next = if slug.is_empty() { new_id.trim().to_string() } else { slug };
        if next.is_empty() || next == old_id {
            return false;
        }
        if self.definition.field(&next).is_some() {
            return false;
        }
        let Some(idx) = self.definition.fields.iter().position(|f| f.id == old_id) else {
            return false;
        };

        self.definition.fields[idx].id = next.clone();
        for field in &mut self.definition.fields {
            if let Some(rule) = field.visible_when.as_mut() {
                if rule.field_id() == old_id {
                    rule.retarget(&next);
                }
            }
        }
        if self.selected.as_deref() == Some(old_id) {
            self.selected = Some(next);
        }
        true
    }

    /// Replace the definition with a template's, clearing the selection.
    pub fn apply_template(&mut self, definition: FormDefinition) {
        self.definition = definition;
        self.selected = None;
    }
}

/// Authoring-side validation: every field id non-empty and unique.
///
/// Violations are reported under the `definition` key and block saving
/// the form or template.
pub fn validate_definition(definition: &FormDefinition) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let mut seen: Vec<&str> = Vec::new();
    for field in &definition.fields {
        let id = field.id.trim();
        if id.is_empty() {
            errors.insert(
                "definition".to_string(),
                "Chaque champ doit avoir un identifiant (id)".to_string(),
            );
            break;
        }
        if seen.contains(&id) {
            errors.insert(
                "definition".to_string(),
                format!("Identifiant dupliqué: {id}"),
            );
            break;
        }
        seen.push(id);
    }
    errors
}

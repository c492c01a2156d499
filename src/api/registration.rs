//! Registration forms and their reusable templates.

use chrono::{DateTime, SecondsFormat};
use serde::Serialize;
use serde_json::json;

use crate::editor::{EntityId, FormModel};
use crate::error::Error;
use crate::fetch::ApiClient;
use crate::forms::{slugify, FieldErrors, FormDefinition};
use crate::query::parse_timestamp_ms;

use super::types::{FormTemplate, RegistrationForm, Submission};

/// The editable shape of a registration form.
///
/// Holds values as the inputs produce them (dates as `YYYY-MM-DD`,
/// capacity as free text); [`RegistrationFormDraft::payload`] normalizes
/// into what the API stores.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationFormDraft {
    pub titre: String,
    pub description: String,
    pub status: String,
    pub starts_at: String,
    pub is_public: bool,
    pub public_slug: String,
    pub capacity_mode: String,
    pub capacity_max: String,
    pub definition: FormDefinition,
}

impl Default for RegistrationFormDraft {
    fn default() -> Self {
        Self {
            titre: String::new(),
            description: String::new(),
            status: "draft".to_string(),
            starts_at: String::new(),
            is_public: false,
            public_slug: String::new(),
            capacity_mode: "SUBMISSIONS".to_string(),
            capacity_max: String::new(),
            definition: FormDefinition::default(),
        }
    }
}

impl RegistrationFormDraft {
    /// Seed a draft from a stored row (dates reduced to their day part,
    /// capacity rendered back to input text).
    pub fn from_item(item: &RegistrationForm) -> Self {
        let starts_at = item
            .starts_at
            .as_deref()
            .map(|s| s.split('T').next().unwrap_or(s).to_string())
            .unwrap_or_default();
        Self {
            titre: item.titre.clone(),
            description: item.description.clone(),
            status: if item.status.is_empty() {
                "draft".to_string()
            } else {
                item.status.clone()
            },
            starts_at,
            is_public: item.is_public,
            public_slug: item.public_slug.clone().unwrap_or_default(),
            capacity_mode: item.capacity_mode(),
            capacity_max: item.capacity_max.map(|n| n.to_string()).unwrap_or_default(),
            definition: item.definition(),
        }
    }

    /// Client-side validation, keyed by field name.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.titre.trim().is_empty() {
            errors.insert("titre".to_string(), "Le titre est requis".to_string());
        }
        if self.status.to_lowercase() == "template" {
            errors.insert(
                "status".to_string(),
                "Les templates se créent dans l’onglet Templates (table dédiée)".to_string(),
            );
        }
        if self.is_public && self.public_slug.trim().is_empty() {
            errors.insert(
                "public_slug".to_string(),
                "Le slug est requis pour rendre le formulaire public".to_string(),
            );
        }
        errors
    }

    /// The normalized wire payload: capacity mode uppercased, capacity
    /// max coerced to a number or null, the opening date expanded to a
    /// full timestamp, `template` status demoted to `draft` (templates
    /// live in their own table), and the public slug defaulted from the
    /// title.
    pub fn payload(&self) -> serde_json::Value {
        let capacity_mode = if self.capacity_mode.trim().is_empty() {
            "SUBMISSIONS".to_string()
        } else {
            self.capacity_mode.to_uppercase()
        };
        let capacity_max = self.capacity_max.trim().parse::<i64>().ok();
        let starts_at = if self.starts_at.trim().is_empty() {
            None
        } else {
            parse_timestamp_ms(&self.starts_at).and_then(|ms| {
                DateTime::from_timestamp_millis(ms)
                    .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            })
        };
        let status = if self.status.to_lowercase() == "template" {
            "draft".to_string()
        } else {
            self.status.clone()
        };
        let slug = self.public_slug.trim();
        let public_slug = if slug.is_empty() {
            slugify(&self.titre)
        } else {
            slug.to_string()
        };

        json!({
            "titre": self.titre,
            "description": self.description,
            "status": status,
            "starts_at": starts_at,
            "is_public": self.is_public,
            "public_slug": public_slug,
            "capacity_mode": capacity_mode,
            "capacity_max": capacity_max,
            "definition": self.definition,
        })
    }
}

impl FormModel for RegistrationFormDraft {
    fn set_field(&mut self, name: &str, value: serde_json::Value) {
        if name == "is_public" {
            self.is_public = value.as_bool().unwrap_or(false);
            return;
        }
        let text = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        match name {
            "titre" => self.titre = text,
            "description" => self.description = text,
            "status" => self.status = text,
            "starts_at" => self.starts_at = text,
            "public_slug" => self.public_slug = text,
            "capacity_mode" => self.capacity_mode = text,
            "capacity_max" => self.capacity_max = text,
            _ => {}
        }
    }
}

/// Pick a public slug not used by any existing form, suffixing `-2`,
/// `-3`, ... when the base is taken.
pub fn unique_public_slug<'a>(
    base: &str,
    taken: impl Iterator<Item = &'a str> + Clone,
) -> String {
    let base = slugify(base);
    if base.is_empty() {
        return base;
    }
    if !taken.clone().any(|slug| slug == base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken.clone().any(|slug| slug == candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Client for `/registration-forms`
#[derive(Clone)]
pub struct RegistrationFormsClient {
    api: ApiClient,
}

impl RegistrationFormsClient {
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<RegistrationForm>, Error> {
        self.api.get("/registration-forms").execute().await
    }

    pub async fn get(&self, id: &EntityId) -> Result<RegistrationForm, Error> {
        self.api
            .get(&format!("/registration-forms/{id}"))
            .execute()
            .await
    }

    pub async fn create(&self, draft: &RegistrationFormDraft) -> Result<RegistrationForm, Error> {
        self.api
            .post("/registration-forms")
            .json(&draft.payload())?
            .execute()
            .await
    }

    pub async fn update(
        &self,
        id: &EntityId,
        draft: &RegistrationFormDraft,
    ) -> Result<RegistrationForm, Error> {
        self.api
            .put(&format!("/registration-forms/{id}"))
            .json(&draft.payload())?
            .execute()
            .await
    }

    /// Archive a form. The server soft-deletes (status becomes
    /// `archived`); the row keeps its submissions.
    pub async fn archive(&self, id: &EntityId) -> Result<(), Error> {
        self.api
            .delete(&format!("/registration-forms/{id}"))
            .execute_empty()
            .await
    }

    /// List the submissions received by one form
    pub async fn submissions(&self, id: &EntityId) -> Result<Vec<Submission>, Error> {
        self.api
            .get(&format!("/registration-forms/{id}/submissions"))
            .execute()
            .await
    }
}

/// The editable shape of a form template
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateDraft {
    pub titre: String,
    pub description: String,
    pub definition: FormDefinition,
    /// `global` or `city`; only superadmins may set it
    pub scope: Option<String>,
    /// Target city for city-scoped templates
    pub city_id: Option<EntityId>,
}

impl TemplateDraft {
    pub fn from_item(item: &FormTemplate) -> Self {
        Self {
            titre: item.titre.clone(),
            description: item.description.clone(),
            definition: item.definition(),
            scope: item.scope.clone(),
            city_id: item.city_id.clone(),
        }
    }

    fn payload(&self) -> serde_json::Value {
        let mut payload = json!({
            "titre": self.titre,
            "description": self.description,
            "definition": self.definition,
        });
        if let Some(scope) = &self.scope {
            let scope = if scope == "global" { "global" } else { "city" };
            payload["scope"] = json!(scope);
            if scope == "city" {
                if let Some(city_id) = &self.city_id {
                    payload["city_id"] = json!(city_id);
                }
            }
        }
        payload
    }
}

/// Client for `/registration-form-templates`
#[derive(Clone)]
pub struct FormTemplatesClient {
    api: ApiClient,
}

impl FormTemplatesClient {
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List templates, optionally narrowed to one scope
    pub async fn list(&self, scope: Option<&str>) -> Result<Vec<FormTemplate>, Error> {
        let mut req = self.api.get("/registration-form-templates");
        if let Some(scope) = scope {
            req = req.query("scope", scope);
        }
        req.execute().await
    }

    pub async fn get(&self, id: &EntityId) -> Result<FormTemplate, Error> {
        self.api
            .get(&format!("/registration-form-templates/{id}"))
            .execute()
            .await
    }

    pub async fn create(&self, draft: &TemplateDraft) -> Result<FormTemplate, Error> {
        self.api
            .post("/registration-form-templates")
            .json(&draft.payload())?
            .execute()
            .await
    }

    pub async fn update(&self, id: &EntityId, draft: &TemplateDraft) -> Result<FormTemplate, Error> {
        self.api
            .put(&format!("/registration-form-templates/{id}"))
            .json(&draft.payload())?
            .execute()
            .await
    }

    pub async fn delete(&self, id: &EntityId) -> Result<(), Error> {
        self.api
            .delete(&format!("/registration-form-templates/{id}"))
            .execute_empty()
            .await
    }
}

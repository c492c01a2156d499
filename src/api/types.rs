//! Server-side record and payload types for every dashboard resource.
//!
//! Field names follow the API's canonical (partly French) naming; serde
//! aliases absorb the legacy client-side spellings still present in older
//! rows (`imageUrl`, `location`, `startDate`).

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize, Serializer};

use crate::editor::{Entity, EntityId, FormModel};
use crate::forms::FormDefinition;
use crate::query::parse_timestamp_ms;

/// A news article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct News {
    pub id: EntityId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, alias = "imageUrl", alias = "photo")]
    pub image: Option<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default, alias = "categoryId")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Entity for News {
    fn id(&self) -> EntityId {
        self.id.clone()
    }
}

/// The editable shape of a news article.
///
/// Serializes with the canonical field names only, whatever spelling the
/// values were set under.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewsDraft {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub author: String,
    pub category_id: Option<String>,
}

impl NewsDraft {
    pub fn from_item(item: &News) -> Self {
        Self {
            title: item.title.clone(),
            content: item.content.clone(),
            image: item.image.clone(),
            author: item.author.clone(),
            category_id: item.category_id.clone(),
        }
    }
}

impl FormModel for NewsDraft {
    fn set_field(&mut self, name: &str, value: serde_json::Value) {
        let text = as_text(&value);
        match name {
            "title" => self.title = text,
            "content" => self.content = text,
            "image" | "imageUrl" | "photo" => self.image = non_empty(text),
            "author" => self.author = text,
            "category_id" | "categoryId" => self.category_id = non_empty(text),
            _ => {}
        }
    }
}

/// A calendar event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EntityId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "location")]
    pub lieu: String,
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
    #[serde(default, alias = "imageUrl", alias = "photo")]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Entity for Event {
    fn id(&self) -> EntityId {
        self.id.clone()
    }
}

/// The editable shape of an event
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub lieu: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub image: Option<String>,
}

impl EventDraft {
    pub fn from_item(item: &Event) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            lieu: item.lieu.clone(),
            start_date: item.start_date.clone(),
            end_date: item.end_date.clone(),
            image: item.image.clone(),
        }
    }
}

impl FormModel for EventDraft {
    fn set_field(&mut self, name: &str, value: serde_json::Value) {
        let text = as_text(&value);
        match name {
            "title" => self.title = text,
            "description" => self.description = text,
            "lieu" | "location" => self.lieu = text,
            "start_date" | "startDate" => self.start_date = non_empty(text),
            "end_date" | "endDate" => self.end_date = non_empty(text),
            "image" | "imageUrl" | "photo" => self.image = non_empty(text),
            _ => {}
        }
    }
}

/// An announcement banner (the API's historical `annoucement` spelling
/// is kept throughout, matching the endpoint and permission key)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annoucement {
    pub id: EntityId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub start_at: Option<String>,
    #[serde(default)]
    pub end_at: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

impl Entity for Annoucement {
    fn id(&self) -> EntityId {
        self.id.clone()
    }
}

/// The editable shape of an announcement.
///
/// Display windows come from datetime-local inputs (`YYYY-MM-DDTHH:MM`);
/// serialization expands them to full timestamps, or null when blank.
#[derive(Debug, Clone, Serialize)]
pub struct AnnoucementDraft {
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub status: String,
    #[serde(serialize_with = "serialize_window_bound")]
    pub start_at: String,
    #[serde(serialize_with = "serialize_window_bound")]
    pub end_at: String,
}

impl Default for AnnoucementDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            image_url: String::new(),
            status: "Brouillon".to_string(),
            start_at: String::new(),
            end_at: String::new(),
        }
    }
}

impl AnnoucementDraft {
    pub fn from_item(item: &Annoucement) -> Self {
        Self {
            title: item.title.clone(),
            content: item.content.clone(),
            image_url: item.image_url.clone().unwrap_or_default(),
            status: if item.status.is_empty() {
                "Brouillon".to_string()
            } else {
                item.status.clone()
            },
            start_at: local_input_value(item.start_at.as_deref()),
            end_at: local_input_value(item.end_at.as_deref()),
        }
    }
}

impl FormModel for AnnoucementDraft {
    fn set_field(&mut self, name: &str, value: serde_json::Value) {
        let text = as_text(&value);
        match name {
            "title" => self.title = text,
            "content" => self.content = text,
            "image_url" => self.image_url = text,
            "status" => self.status = text,
            "start_at" => self.start_at = text,
            "end_at" => self.end_at = text,
            _ => {}
        }
    }
}

/// A citizen-submitted report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: EntityId,
    #[serde(default)]
    pub titre: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub categorie: String,
    #[serde(default)]
    pub urgence: String,
    #[serde(default, alias = "adminComment")]
    pub admin_comment: Option<String>,
    #[serde(default, alias = "userName")]
    pub user_name: Option<String>,
    #[serde(default, alias = "userEmail")]
    pub user_email: Option<String>,
    #[serde(default, alias = "photoUrl")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Entity for Report {
    fn id(&self) -> EntityId {
        self.id.clone()
    }
}

/// The admin-editable part of a report
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportUpdate {
    pub status: String,
    pub categorie: String,
    pub urgence: String,
    pub admin_comment: Option<String>,
}

impl ReportUpdate {
    pub fn from_item(item: &Report) -> Self {
        Self {
            status: item.status.clone(),
            categorie: item.categorie.clone(),
            urgence: item.urgence.clone(),
            admin_comment: item.admin_comment.clone(),
        }
    }
}

impl FormModel for ReportUpdate {
    fn set_field(&mut self, name: &str, value: serde_json::Value) {
        let text = as_text(&value);
        match name {
            "status" => self.status = text,
            "categorie" => self.categorie = text,
            "urgence" => self.urgence = text,
            "admin_comment" | "adminComment" => self.admin_comment = non_empty(text),
            _ => {}
        }
    }
}

/// A mobile-app user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: EntityId,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub profile: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Entity for UserAccount {
    fn id(&self) -> EntityId {
        self.id.clone()
    }
}

/// One selectable choice of a poll
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, alias = "text")]
    pub label: String,
}

/// A poll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poll {
    pub id: EntityId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub end_at: Option<String>,
    #[serde(default)]
    pub options: Vec<PollOption>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Entity for Poll {
    fn id(&self) -> EntityId {
        self.id.clone()
    }
}

/// The editable shape of a poll.
///
/// Options are kept as the drawer edits them (blank rows included);
/// serialization trims labels and strips empty rows so the stored JSON
/// stays an array of `{id, label}`.
#[derive(Debug, Clone, Serialize)]
pub struct PollDraft {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub starts_at: String,
    pub end_at: String,
    #[serde(serialize_with = "serialize_poll_choices")]
    pub options: Vec<PollOption>,
}

impl Default for PollDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            kind: "single_choice".to_string(),
            status: "Brouillon".to_string(),
            starts_at: String::new(),
            end_at: String::new(),
            options: vec![PollOption::default(), PollOption::default()],
        }
    }
}

impl PollDraft {
    /// Seed a draft from a stored poll, padding back to the two option
    /// rows the drawer always shows.
    pub fn from_item(item: &Poll) -> Self {
        let mut options: Vec<PollOption> = item
            .options
            .iter()
            .map(|opt| PollOption {
                id: opt.id.clone(),
                label: opt.label.trim().to_string(),
            })
            .collect();
        while options.len() < 2 {
            options.push(PollOption::default());
        }
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            kind: if item.kind.is_empty() {
                "single_choice".to_string()
            } else {
                item.kind.clone()
            },
            status: if item.status.is_empty() {
                "Brouillon".to_string()
            } else {
                item.status.clone()
            },
            starts_at: local_input_value(item.starts_at.as_deref()),
            end_at: local_input_value(item.end_at.as_deref()),
            options,
        }
    }

    /// The choices that would actually be stored
    pub fn choices(&self) -> Vec<PollOption> {
        self.options
            .iter()
            .map(|opt| PollOption {
                id: opt.id.clone(),
                label: opt.label.trim().to_string(),
            })
            .filter(|opt| !opt.label.is_empty())
            .collect()
    }

    /// Client-side validation, keyed by field name.
    pub fn validate(&self) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();
        if self.title.trim().is_empty() {
            errors.insert("title".to_string(), "Le titre est requis".to_string());
        }
        let choices = self.choices();
        if choices.len() < 2 {
            errors.insert("options".to_string(), "Ajoutez au moins 2 choix.".to_string());
        } else {
            let mut labels: Vec<String> = choices.iter().map(|c| c.label.to_lowercase()).collect();
            labels.sort();
            labels.dedup();
            if labels.len() != choices.len() {
                errors.insert(
                    "options".to_string(),
                    "Les choix doivent être uniques.".to_string(),
                );
            }
        }
        errors
    }
}

impl FormModel for PollDraft {
    fn set_field(&mut self, name: &str, value: serde_json::Value) {
        let text = as_text(&value);
        match name {
            "title" => self.title = text,
            "description" => self.description = text,
            "type" => self.kind = text,
            "status" => self.status = text,
            "starts_at" => self.starts_at = text,
            "end_at" => self.end_at = text,
            _ => {}
        }
    }
}

/// A registration form row, as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub id: EntityId,
    #[serde(default)]
    pub titre: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub public_slug: Option<String>,
    #[serde(default)]
    pub capacity_mode: Option<String>,
    #[serde(default)]
    pub capacity_max: Option<i64>,
    #[serde(default)]
    pub capacity_used: Option<i64>,
    /// Raw definition blob; coerce through [`RegistrationForm::definition`]
    #[serde(default)]
    pub definition: serde_json::Value,
}

impl RegistrationForm {
    /// The parsed form definition (lenient, never fails)
    pub fn definition(&self) -> FormDefinition {
        FormDefinition::from_value(&self.definition)
    }

    /// Uppercased capacity mode, `SUBMISSIONS` when unset
    pub fn capacity_mode(&self) -> String {
        self.capacity_mode
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or("SUBMISSIONS")
            .to_uppercase()
    }
}

impl Entity for RegistrationForm {
    fn id(&self) -> EntityId {
        self.id.clone()
    }
}

/// A reusable registration form template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormTemplate {
    pub id: EntityId,
    #[serde(default)]
    pub titre: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub city_id: Option<EntityId>,
    #[serde(default)]
    pub definition: serde_json::Value,
}

impl FormTemplate {
    /// The parsed form definition (lenient, never fails)
    pub fn definition(&self) -> FormDefinition {
        FormDefinition::from_value(&self.definition)
    }
}

impl Entity for FormTemplate {
    fn id(&self) -> EntityId {
        self.id.clone()
    }
}

/// One submitted registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: EntityId,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub persons_count: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Entity for Submission {
    fn id(&self) -> EntityId {
        self.id.clone()
    }
}

/// Answer of a successful public submission
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionReceipt {
    /// Places left, when the form is capacity-limited
    #[serde(default)]
    pub remaining: Option<i64>,
}

impl SubmissionReceipt {
    /// French confirmation wording, with the remaining places when the
    /// form is capacity-limited
    pub fn success_message(&self) -> String {
        match self.remaining {
            None => "Inscription envoyée avec succès.".to_string(),
            Some(remaining) => format!("Inscription envoyée. Places restantes: {remaining}"),
        }
    }
}

/// Answer of a file upload
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// City contact channels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityContacts {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub facebook: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub tiktok: String,
    #[serde(default)]
    pub x: String,
    #[serde(default)]
    pub others: Vec<String>,
}

/// Weekly opening hours, free-text per day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub monday: String,
    #[serde(default)]
    pub tuesday: String,
    #[serde(default)]
    pub wednesday: String,
    #[serde(default)]
    pub thursday: String,
    #[serde(default)]
    pub friday: String,
    #[serde(default)]
    pub saturday: String,
    #[serde(default)]
    pub sunday: String,
}

/// Editable city settings blob.
///
/// Serde defaults give the merge-with-defaults behavior: partial rows
/// deserialize into a fully populated value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitySettings {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contacts: CityContacts,
    #[serde(default)]
    pub opening_hours: OpeningHours,
}

/// Render a stored timestamp back into a datetime-local input value
/// (`YYYY-MM-DDTHH:MM`, UTC). Absent or unparsable values come back empty.
fn local_input_value(value: Option<&str>) -> String {
    value
        .and_then(parse_timestamp_ms)
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or_default()
}

fn serialize_window_bound<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    match parse_timestamp_ms(value).and_then(DateTime::from_timestamp_millis) {
        Some(dt) => serializer.serialize_some(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => serializer.serialize_none(),
    }
}

fn serialize_poll_choices<S: Serializer>(
    options: &[PollOption],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let cleaned: Vec<PollOption> = options
        .iter()
        .map(|opt| PollOption {
            id: opt.id.clone(),
            label: opt.label.trim().to_string(),
        })
        .filter(|opt| !opt.label.is_empty())
        .collect();
    cleaned.serialize(serializer)
}

fn as_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_field_spellings_are_absorbed() {
        let item: Event = serde_json::from_value(json!({
            "id": 4,
            "title": "Fête de la musique",
            "location": "Place du marché",
            "startDate": "2025-06-21T18:00:00Z"
        }))
        .unwrap();
        assert_eq!(item.lieu, "Place du marché");
        assert_eq!(item.start_date.as_deref(), Some("2025-06-21T18:00:00Z"));

        let draft = EventDraft::from_item(&item);
        let wire = serde_json::to_value(&draft).unwrap();
        assert_eq!(wire["lieu"], "Place du marché");
        assert!(wire.get("location").is_none());
    }

    #[test]
    fn drafts_route_aliased_field_changes() {
        let mut draft = NewsDraft::default();
        draft.set_field("title", json!("Travaux rue principale"));
        draft.set_field("imageUrl", json!("https://cdn.example/img.jpg"));
        draft.set_field("unknown", json!("ignored"));
        assert_eq!(draft.title, "Travaux rue principale");
        assert_eq!(draft.image.as_deref(), Some("https://cdn.example/img.jpg"));
    }

    #[test]
    fn partial_settings_fill_with_defaults() {
        let settings: CitySettings = serde_json::from_value(json!({
            "address": "1 place de la Mairie",
            "contacts": { "phone": "01 02 03 04 05" }
        }))
        .unwrap();
        assert_eq!(settings.contacts.phone, "01 02 03 04 05");
        assert_eq!(settings.contacts.email, "");
        assert_eq!(settings.opening_hours.monday, "");
    }

    #[test]
    fn annoucement_draft_expands_window_bounds() {
        let draft = AnnoucementDraft {
            title: "Coupure d'eau".to_string(),
            start_at: "2025-09-01T18:00".to_string(),
            ..Default::default()
        };
        let wire = serde_json::to_value(&draft).unwrap();
        assert_eq!(wire["start_at"], "2025-09-01T18:00:00.000Z");
        assert_eq!(wire["end_at"], serde_json::Value::Null);
        assert_eq!(wire["status"], "Brouillon");

        let item: Annoucement = serde_json::from_value(json!({
            "id": 3,
            "title": "Coupure d'eau",
            "start_at": "2025-09-01T18:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(AnnoucementDraft::from_item(&item).start_at, "2025-09-01T18:00");
    }

    #[test]
    fn poll_draft_strips_blank_choices_on_the_wire() {
        let mut draft = PollDraft::default();
        draft.set_field("title", json!("Projet 2026"));
        draft.options = vec![
            PollOption { id: Some("a".to_string()), label: "  Parc  ".to_string() },
            PollOption { id: Some("b".to_string()), label: "".to_string() },
            PollOption { id: Some("c".to_string()), label: "Piscine".to_string() },
        ];

        let wire = serde_json::to_value(&draft).unwrap();
        assert_eq!(wire["type"], "single_choice");
        assert_eq!(
            wire["options"],
            json!([
                { "id": "a", "label": "Parc" },
                { "id": "c", "label": "Piscine" }
            ])
        );
    }

    #[test]
    fn poll_draft_requires_two_unique_choices() {
        let mut draft = PollDraft::default();
        draft.set_field("title", json!("Projet 2026"));
        assert!(draft.validate().contains_key("options"));

        draft.options = vec![
            PollOption { id: None, label: "Parc".to_string() },
            PollOption { id: None, label: "parc ".to_string() },
        ];
        assert_eq!(
            draft.validate().get("options").map(String::as_str),
            Some("Les choix doivent être uniques.")
        );

        draft.options[1].label = "Piscine".to_string();
        assert!(draft.validate().is_empty());
    }

    #[test]
    fn poll_draft_pads_back_to_two_option_rows() {
        let item: Poll = serde_json::from_value(json!({
            "id": 1,
            "title": "Projet",
            "options": [{ "id": "a", "text": "Parc" }]
        }))
        .unwrap();
        let draft = PollDraft::from_item(&item);
        assert_eq!(draft.options.len(), 2);
        assert_eq!(draft.options[0].label, "Parc");
        assert_eq!(draft.options[1].label, "");
    }

    #[test]
    fn capacity_mode_defaults_and_uppercases() {
        let form: RegistrationForm = serde_json::from_value(json!({
            "id": 1, "titre": "Cantine", "capacity_mode": "persons"
        }))
        .unwrap();
        assert_eq!(form.capacity_mode(), "PERSONS");

        let bare: RegistrationForm =
            serde_json::from_value(json!({ "id": 2, "titre": "Sortie" })).unwrap();
        assert_eq!(bare.capacity_mode(), "SUBMISSIONS");
    }
}

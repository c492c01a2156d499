//! Generic entity editing controller.
//!
//! One [`EntityEditor`] instance owns the full lifecycle of a list-backed
//! editable entity: loading, drawer open/closed state, create vs. edit
//! mode, per-field validation errors, optimistic messaging and delete
//! confirmation. Pages supply the CRUD operations ([`EntityOps`]), a form
//! shape ([`FormModel`]) and message wording; the controller owns all
//! state and never panics the host on a failed request.
//!
//! The in-memory list is never patched incrementally: after any mutation
//! resolves, a full re-fetch replaces it, so the list always matches one
//! subsequent server fetch.

mod messages;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use messages::{Message, Messages};

/// A server-assigned entity identifier (string or number)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Numeric id
    Number(i64),
    /// String id (uuid, slug)
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{n}"),
            EntityId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId::Number(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId::Text(value.to_string())
    }
}

/// A server-owned record with a stable identifier.
///
/// The editor never interprets any other field; mapping into form shapes
/// goes through the injected `map_item` function.
pub trait Entity {
    /// The record's stable id
    fn id(&self) -> EntityId;
}

/// A mutable form shape driven by generic field changes.
pub trait FormModel: Clone + Send + 'static {
    /// Set the named field. Unknown names are ignored.
    fn set_field(&mut self, name: &str, value: serde_json::Value);
}

/// A single form-control change, native or synthetic.
#[derive(Debug, Clone)]
pub struct FieldChange {
    /// Field name
    pub name: String,
    /// New value
    pub value: serde_json::Value,
}

impl FieldChange {
    /// Convenience constructor
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The CRUD operations backing one editor instance.
#[async_trait]
pub trait EntityOps: Send + Sync {
    /// The server-owned record type
    type Item: Entity + Clone + Send + Sync;
    /// The editable form shape
    type Form: FormModel;

    /// Fetch the full list
    async fn fetch_all(&self) -> Result<Vec<Self::Item>, Error>;
    /// Create a record from the form
    async fn create(&self, form: &Self::Form) -> Result<(), Error>;
    /// Update an existing record from the form
    async fn update(&self, id: &EntityId, form: &Self::Form) -> Result<(), Error>;
    /// Delete (or archive) a record
    async fn delete(&self, id: &EntityId) -> Result<(), Error>;
}

/// Transient user notifications (toasts).
pub trait Notifier: Send + Sync {
    /// Surface a success message
    fn success(&self, message: &str);
    /// Surface an error message
    fn error(&self, message: &str);
}

/// A [`Notifier`] that writes to the log, for headless hosts and tests.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        log::info!("{message}");
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// The destructive-action confirmation prompt.
#[derive(Debug, Clone)]
pub struct ConfirmPrompt {
    /// Dialog title
    pub title: String,
    /// Prompt body
    pub message: String,
    /// Confirm button label
    pub confirm_text: String,
    /// Cancel button label
    pub cancel_text: String,
}

/// Asynchronous yes/no confirmation, answered by the host's dialog.
#[async_trait]
pub trait ConfirmDialog: Send + Sync {
    /// Ask the user; `false` aborts the action with no effect.
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}

/// A [`ConfirmDialog`] that always accepts, for headless hosts and tests.
pub struct AlwaysConfirm;

#[async_trait]
impl ConfirmDialog for AlwaysConfirm {
    async fn confirm(&self, _prompt: &ConfirmPrompt) -> bool {
        true
    }
}

/// The drawer/session tri-state. The drawer is open iff the session is
/// `Creating` or `Editing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorSession {
    /// Drawer closed
    Closed,
    /// Creating a new record
    Creating,
    /// Editing the record with this id
    Editing(EntityId),
}

/// Everything one editor instance is constructed with.
pub struct EditorConfig<O: EntityOps> {
    /// CRUD operations
    pub ops: Arc<O>,
    /// Form state seeded on create and on close
    pub initial_form: O::Form,
    /// Map a record into its editable form shape
    pub map_item: Box<dyn Fn(&O::Item) -> O::Form + Send + Sync>,
    /// Client-side validation; a non-empty map blocks submission
    pub validate: Box<dyn Fn(&O::Form) -> BTreeMap<String, String> + Send + Sync>,
    /// Message wording
    pub messages: Messages,
}

struct EditorState<T, F> {
    items: Vec<T>,
    loading: bool,
    session: EditorSession,
    form: F,
    errors: BTreeMap<String, String>,
}

/// The generic entity editing state machine.
///
/// Shared behind `Arc`; all methods take `&self`. Locks are never held
/// across an await.
pub struct EntityEditor<O: EntityOps> {
    config: EditorConfig<O>,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn ConfirmDialog>,
    state: Mutex<EditorState<O::Item, O::Form>>,
    refresh_in_flight: AtomicBool,
    generation: AtomicU64,
}

impl<O: EntityOps> EntityEditor<O> {
    /// Build an editor without loading anything yet.
    pub fn new(
        config: EditorConfig<O>,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn ConfirmDialog>,
    ) -> Self {
        let form = config.initial_form.clone();
        Self {
            config,
            notifier,
            confirm,
            state: Mutex::new(EditorState {
                items: Vec::new(),
                loading: true,
                session: EditorSession::Closed,
                form,
                errors: BTreeMap::new(),
            }),
            refresh_in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    /// Build an editor and run the initial refresh.
    pub async fn mount(
        config: EditorConfig<O>,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn ConfirmDialog>,
    ) -> Arc<Self> {
        let editor = Arc::new(Self::new(config, notifier, confirm));
        editor.refresh().await;
        editor
    }

    /// Re-fetch the full list.
    ///
    /// At most one refresh is in flight at a time: a call arriving while
    /// one is pending is dropped, not queued. Callers needing a fresh
    /// result after a drop must call again once the pending one resolves.
    /// On failure the current list is kept and the load-error message is
    /// surfaced (server wording preferred when present).
    pub async fn refresh(&self) {
        if self.refresh_in_flight.swap(true, Ordering::SeqCst) {
            return;
        }
        let generation = self.generation.load(Ordering::SeqCst);
        self.state.lock().unwrap().loading = true;

        let outcome = self.config.ops.fetch_all().await;

        let mut failure = None;
        if self.generation.load(Ordering::SeqCst) == generation {
            let mut state = self.state.lock().unwrap();
            match outcome {
                Ok(items) => state.items = items,
                Err(err) => failure = Some(self.config.messages.resolve_load(&err)),
            }
            state.loading = false;
        }
        self.refresh_in_flight.store(false, Ordering::SeqCst);

        if let Some(message) = failure {
            log::warn!("list refresh failed: {message}");
            self.notifier.error(&message);
        }
    }

    /// Invalidate in-flight work: a refresh resolving after this call
    /// discards its result instead of updating disposed state.
    pub fn detach(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Open the drawer in create mode, discarding any edit in progress.
    pub fn open_create(&self) {
        let mut state = self.state.lock().unwrap();
        state.session = EditorSession::Creating;
        state.form = self.config.initial_form.clone();
        state.errors.clear();
    }

    /// Open the drawer in edit mode for `item`, seeding the form from it.
    pub fn open_edit(&self, item: &O::Item) {
        let mut state = self.state.lock().unwrap();
        state.session = EditorSession::Editing(item.id());
        state.form = (self.config.map_item)(item);
        state.errors.clear();
    }

    /// Close the drawer, discarding unsaved changes.
    pub fn close_drawer(&self) {
        let mut state = self.state.lock().unwrap();
        state.session = EditorSession::Closed;
        state.form = self.config.initial_form.clone();
        state.errors.clear();
    }

    /// Apply a form-control change and clear that field's error.
    pub fn handle_input_change(&self, change: FieldChange) {
        let mut state = self.state.lock().unwrap();
        state.form.set_field(&change.name, change.value);
        state.errors.remove(&change.name);
    }

    /// Validate and submit the current form.
    ///
    /// Validation errors replace the error map wholesale and abort with
    /// no network call. On success the list is refreshed, the drawer
    /// closes and the success message is surfaced. On failure the session
    /// and form stay untouched so the user can retry without re-entering
    /// data.
    pub async fn handle_submit(&self) {
        let (form, session) = {
            let mut state = self.state.lock().unwrap();
            let errors = (self.config.validate)(&state.form);
            state.errors = errors.clone();
            if !errors.is_empty() {
                return;
            }
            (state.form.clone(), state.session.clone())
        };

        let result = match &session {
            EditorSession::Editing(id) => self.config.ops.update(id, &form).await,
            EditorSession::Creating => self.config.ops.create(&form).await,
            EditorSession::Closed => return,
        };

        match result {
            Ok(()) => {
                self.refresh().await;
                self.close_drawer();
                let message = match session {
                    EditorSession::Editing(_) => &self.config.messages.update_success,
                    _ => &self.config.messages.create_success,
                };
                self.notifier.success(message);
            }
            Err(err) => {
                let message = self.config.messages.resolve_save(&err);
                log::warn!("save failed: {message}");
                self.notifier.error(&message);
            }
        }
    }

    /// Confirm and delete `item`. No-op on `None` or when declined.
    /// Closes the drawer only when the deleted record was being edited.
    pub async fn handle_delete(&self, item: Option<&O::Item>) {
        let Some(item) = item else { return };

        let prompt = ConfirmPrompt {
            title: "Confirmer la suppression".to_string(),
            message: self.config.messages.confirm_delete.clone(),
            confirm_text: "Supprimer".to_string(),
            cancel_text: "Annuler".to_string(),
        };
        if !self.confirm.confirm(&prompt).await {
            return;
        }

        let id = item.id();
        match self.config.ops.delete(&id).await {
            Ok(()) => {
                self.refresh().await;
                let was_editing = matches!(
                    &self.state.lock().unwrap().session,
                    EditorSession::Editing(current) if *current == id
                );
                if was_editing {
                    self.close_drawer();
                }
                self.notifier.success(&self.config.messages.delete_success);
            }
            Err(err) => {
                let message = self.config.messages.resolve_delete(&err);
                log::warn!("delete failed: {message}");
                self.notifier.error(&message);
            }
        }
    }

    /// Snapshot of the current list
    pub fn items(&self) -> Vec<O::Item> {
        self.state.lock().unwrap().items.clone()
    }

    /// Whether a list load is in progress
    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    /// The current drawer/session state
    pub fn session(&self) -> EditorSession {
        self.state.lock().unwrap().session.clone()
    }

    /// Whether the drawer is open
    pub fn is_drawer_open(&self) -> bool {
        self.state.lock().unwrap().session != EditorSession::Closed
    }

    /// The id being edited, if any
    pub fn editing_id(&self) -> Option<EntityId> {
        match self.session() {
            EditorSession::Editing(id) => Some(id),
            _ => None,
        }
    }

    /// Snapshot of the current form state
    pub fn form(&self) -> O::Form {
        self.state.lock().unwrap().form.clone()
    }

    /// Replace the form state (builder pages editing nested structures)
    pub fn set_form(&self, form: O::Form) {
        self.state.lock().unwrap().form = form;
    }

    /// Edit the form state in place
    pub fn update_form<F: FnOnce(&mut O::Form)>(&self, f: F) {
        f(&mut self.state.lock().unwrap().form);
    }

    /// Snapshot of the current validation errors
    pub fn errors(&self) -> BTreeMap<String, String> {
        self.state.lock().unwrap().errors.clone()
    }
}

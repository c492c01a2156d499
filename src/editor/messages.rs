//! User-facing message configuration for the entity editor.

use crate::error::Error;

/// A configurable message: a fixed string, or a function of the error.
pub enum Message {
    /// Fixed wording
    Text(String),
    /// Wording derived from the error that occurred
    Resolver(Box<dyn Fn(&Error) -> String + Send + Sync>),
}

impl Message {
    /// Fixed wording
    pub fn text(value: impl Into<String>) -> Message {
        Message::Text(value.into())
    }

    /// Wording derived from the error
    pub fn with(f: impl Fn(&Error) -> String + Send + Sync + 'static) -> Message {
        Message::Resolver(Box::new(f))
    }

    fn resolve(&self, error: &Error, prefer_server: bool) -> String {
        match self {
            Message::Resolver(f) => f(error),
            Message::Text(text) => {
                if prefer_server {
                    if let Some(server) = error.server_message() {
                        return server.to_string();
                    }
                }
                text.clone()
            }
        }
    }
}

/// The full message table of one editor instance.
///
/// Defaults carry the dashboard's French wording; pages override the
/// entries they care about.
pub struct Messages {
    /// Listing failed
    pub load_error: Message,
    /// Create or update failed
    pub save_error: Message,
    /// Delete failed
    pub delete_error: Message,
    /// Create succeeded
    pub create_success: String,
    /// Update succeeded
    pub update_success: String,
    /// Delete succeeded
    pub delete_success: String,
    /// Delete confirmation prompt
    pub confirm_delete: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            load_error: Message::text("Erreur lors du chargement"),
            save_error: Message::text("Erreur lors de la sauvegarde"),
            delete_error: Message::text("Erreur lors de la suppression"),
            create_success: "Création effectuée".to_string(),
            update_success: "Mise à jour effectuée".to_string(),
            delete_success: "Suppression effectuée".to_string(),
            confirm_delete: "Êtes-vous sûr de vouloir supprimer cet élément ?".to_string(),
        }
    }
}

impl Messages {
    /// Resolve the load-error message. Prefers a server-supplied message
    /// over the configured static wording.
    pub fn resolve_load(&self, error: &Error) -> String {
        self.load_error.resolve(error, true)
    }

    /// Resolve the save-error message
    pub fn resolve_save(&self, error: &Error) -> String {
        self.save_error.resolve(error, false)
    }

    /// Resolve the delete-error message
    pub fn resolve_delete(&self, error: &Error) -> String {
        self.delete_error.resolve(error, false)
    }
}

//! Session persistence and the authenticated application context

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use log::warn;

use crate::auth::types::{AdminAccount, City};

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "admin_token";
/// Storage key for the serialized administrator account
pub const ADMIN_KEY: &str = "admin_info";
/// Storage key for the serialized city profile
pub const CITY_KEY: &str = "admin_city";

/// Key-value persistence for session state (JSON-serialized values).
///
/// Hosts back this with whatever storage they have (browser local
/// storage, a settings file); tests use [`MemoryStore`].
pub trait SessionStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value
    fn set(&self, key: &str, value: &str);
    /// Remove a value
    fn remove(&self, key: &str);
}

/// In-memory [`SessionStore`]
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

#[derive(Default, Clone)]
struct SessionState {
    token: Option<String>,
    admin: Option<AdminAccount>,
    city: Option<City>,
}

/// The explicit application context: `{token, admin, city}`.
///
/// Rehydrated from the [`SessionStore`] at construction; persisted state
/// is written only by the `login`/`logout`/update mutators, which are the
/// sole writers, so no further locking discipline is needed beyond the
/// inner `RwLock`.
pub struct AuthSession {
    store: Arc<dyn SessionStore>,
    state: RwLock<SessionState>,
}

impl AuthSession {
    /// Rehydrate a session from persisted storage.
    ///
    /// Entries that fail to parse are dropped rather than propagated: a
    /// corrupt cache must never lock the user out of the login screen.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let token = store.get(TOKEN_KEY);
        let admin = store.get(ADMIN_KEY).and_then(|raw| parse_entry(ADMIN_KEY, &raw));
        let city = store.get(CITY_KEY).and_then(|raw| parse_entry(CITY_KEY, &raw));

        Self {
            store,
            state: RwLock::new(SessionState { token, admin, city }),
        }
    }

    /// The current bearer token, if authenticated
    pub fn token(&self) -> Option<String> {
        self.state.read().unwrap().token.clone()
    }

    /// The cached administrator account
    pub fn admin(&self) -> Option<AdminAccount> {
        self.state.read().unwrap().admin.clone()
    }

    /// The cached city profile
    pub fn city(&self) -> Option<City> {
        self.state.read().unwrap().city.clone()
    }

    /// Whether a token is present
    pub fn is_authenticated(&self) -> bool {
        self.state.read().unwrap().token.is_some()
    }

    /// Store a fresh session after a successful login
    pub fn login(&self, token: &str, admin: AdminAccount, city: Option<City>) {
        self.store.set(TOKEN_KEY, token);
        persist_entry(self.store.as_ref(), ADMIN_KEY, &admin);
        if let Some(ref city) = city {
            persist_entry(self.store.as_ref(), CITY_KEY, city);
        }

        let mut state = self.state.write().unwrap();
        state.token = Some(token.to_string());
        state.admin = Some(admin);
        state.city = city;
    }

    /// Clear the session and all persisted auth state
    pub fn logout(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(ADMIN_KEY);
        self.store.remove(CITY_KEY);

        let mut state = self.state.write().unwrap();
        *state = SessionState::default();
    }

    /// Patch the cached city profile (e.g. after a logo update)
    pub fn update_city<F: FnOnce(&mut City)>(&self, patch: F) {
        let mut state = self.state.write().unwrap();
        let mut city = state.city.clone().unwrap_or_default();
        patch(&mut city);
        persist_entry(self.store.as_ref(), CITY_KEY, &city);
        state.city = Some(city);
    }

    /// Replace the cached administrator account (profile patch)
    pub fn set_admin(&self, admin: AdminAccount) {
        persist_entry(self.store.as_ref(), ADMIN_KEY, &admin);
        self.state.write().unwrap().admin = Some(admin);
    }
}

fn parse_entry<T: serde::de::DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("dropping unparsable session entry {key}: {err}");
            None
        }
    }
}

fn persist_entry<T: serde::Serialize>(store: &dyn SessionStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => store.set(key, &json),
        Err(err) => warn!("could not persist session entry {key}: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(role: &str) -> AdminAccount {
        AdminAccount {
            id: None,
            email: Some("staff@ville.fr".to_string()),
            role: role.to_string(),
            profile: None,
        }
    }

    #[test]
    fn login_persists_and_logout_clears() {
        let store = Arc::new(MemoryStore::new());
        let session = AuthSession::new(store.clone());

        session.login("tok-1", admin("admin"), Some(City::default()));
        assert!(session.is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("tok-1"));
        assert!(store.get(ADMIN_KEY).is_some());

        session.logout();
        assert!(!session.is_authenticated());
        assert!(store.get(TOKEN_KEY).is_none());
        assert!(store.get(ADMIN_KEY).is_none());
        assert!(store.get(CITY_KEY).is_none());
    }

    #[test]
    fn rehydrates_from_store() {
        let store = Arc::new(MemoryStore::new());
        {
            let session = AuthSession::new(store.clone());
            session.login("tok-2", admin("superadmin"), None);
        }

        let session = AuthSession::new(store);
        assert_eq!(session.token().as_deref(), Some("tok-2"));
        assert_eq!(session.admin().map(|a| a.role), Some("superadmin".to_string()));
    }

    #[test]
    fn corrupt_entries_are_dropped() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "tok-3");
        store.set(ADMIN_KEY, "{not json");

        let session = AuthSession::new(store);
        assert_eq!(session.token().as_deref(), Some("tok-3"));
        assert!(session.admin().is_none());
    }

    #[test]
    fn update_city_patches_cached_profile() {
        let store = Arc::new(MemoryStore::new());
        let session = AuthSession::new(store.clone());
        session.login("tok", admin("admin"), Some(City::default()));

        session.update_city(|city| city.logo_url = Some("/uploads/logo.png".to_string()));
        assert_eq!(
            session.city().and_then(|c| c.logo_url),
            Some("/uploads/logo.png".to_string())
        );
        assert!(store.get(CITY_KEY).unwrap().contains("logo.png"));
    }
}

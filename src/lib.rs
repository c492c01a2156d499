//! CityHall Rust Client Library
//!
//! A Rust client for the CityHall municipal administration API, together
//! with the reusable dashboard core: the generic entity editing state
//! machine, text/date list querying, dynamic form definitions and
//! access-level resolution.

pub mod access;
pub mod api;
pub mod auth;
pub mod config;
pub mod editor;
pub mod error;
pub mod fetch;
pub mod forms;
pub mod query;

use std::sync::Arc;

use reqwest::Client;

use crate::api::{
    AdminClient, Annoucement, CityClient, Event, FormTemplatesClient, News, Poll,
    PublicFormsClient, RegistrationFormsClient, Report, ResourceClient, UploadsClient, UserAccount,
};
use crate::auth::{AuthClient, AuthSession, MemoryStore, SessionStore};
use crate::config::ClientOptions;
use crate::fetch::ApiClient;

/// The main entry point for the CityHall client
pub struct CityHall {
    /// The API base URL
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// The shared session (token, admin, city)
    pub session: Arc<AuthSession>,
    /// Client options
    pub options: ClientOptions,
    api: ApiClient,
}

impl CityHall {
    /// Create a new client backed by the given session store.
    ///
    /// The session is rehydrated from the store, so a process restarting
    /// with a persisted token is authenticated immediately.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use cityhall_client::CityHall;
    /// use cityhall_client::auth::MemoryStore;
    ///
    /// let city_hall = CityHall::new("http://localhost:3000/api", Arc::new(MemoryStore::new()));
    /// ```
    pub fn new(url: &str, store: Arc<dyn SessionStore>) -> Self {
        Self::new_with_options(url, store, ClientOptions::default())
    }

    /// Create a new client with custom options
    pub fn new_with_options(
        url: &str,
        store: Arc<dyn SessionStore>,
        options: ClientOptions,
    ) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        // Client::builder only fails on TLS backend misconfiguration;
        // fall back to the default client rather than failing construction.
        let http_client = builder.build().unwrap_or_default();

        let session = Arc::new(AuthSession::new(store));
        let api = ApiClient::new(url, http_client.clone(), session.clone());

        Self {
            url: url.to_string(),
            http_client,
            session,
            options,
            api,
        }
    }

    /// Create a throwaway client with an in-memory session, reading the
    /// base URL from `CITYHALL_API_URL`
    pub fn from_env() -> Self {
        Self::new(
            &ClientOptions::base_url_from_env(),
            Arc::new(MemoryStore::new()),
        )
    }

    /// The authentication client
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.api.clone())
    }

    /// CRUD over `/news`
    pub fn news(&self) -> ResourceClient<News> {
        ResourceClient::new(self.api.clone(), "/news")
    }

    /// CRUD over `/events`
    pub fn events(&self) -> ResourceClient<Event> {
        ResourceClient::new(self.api.clone(), "/events")
    }

    /// CRUD over `/annoucements` (the API's historical spelling)
    pub fn annoucements(&self) -> ResourceClient<Annoucement> {
        ResourceClient::new(self.api.clone(), "/annoucements")
    }

    /// CRUD over `/reports`
    pub fn reports(&self) -> ResourceClient<Report> {
        ResourceClient::new(self.api.clone(), "/reports")
    }

    /// CRUD over `/users`
    pub fn users(&self) -> ResourceClient<UserAccount> {
        ResourceClient::new(self.api.clone(), "/users")
    }

    /// CRUD over `/polls`
    pub fn polls(&self) -> ResourceClient<Poll> {
        ResourceClient::new(self.api.clone(), "/polls")
    }

    /// The registration forms client
    pub fn registration_forms(&self) -> RegistrationFormsClient {
        RegistrationFormsClient::new(self.api.clone())
    }

    /// The form templates client
    pub fn form_templates(&self) -> FormTemplatesClient {
        FormTemplatesClient::new(self.api.clone())
    }

    /// The city profile and settings client
    pub fn city(&self) -> CityClient {
        CityClient::new(self.api.clone())
    }

    /// The superadmin client
    pub fn admin(&self) -> AdminClient {
        AdminClient::new(self.api.clone())
    }

    /// The file uploads client
    pub fn uploads(&self) -> UploadsClient {
        UploadsClient::new(self.api.clone())
    }

    /// The unauthenticated public forms client
    pub fn public_forms(&self) -> PublicFormsClient {
        PublicFormsClient::new(self.api.clone())
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::access::{can_edit, can_view, AccessLevel, Page};
    pub use crate::auth::{AuthSession, MemoryStore, SessionStore};
    pub use crate::config::ClientOptions;
    pub use crate::editor::{
        EditorConfig, EditorSession, EntityEditor, EntityId, EntityOps, FormModel, Messages,
    };
    pub use crate::error::Error;
    pub use crate::forms::{FormBuilder, FormDefinition};
    pub use crate::query::{filter_and_sort, ListQuery, SortKey};
    pub use crate::CityHall;
}

//! Authentication against the CityHall API

mod session;
mod types;

use std::collections::HashMap;

use crate::error::Error;
use crate::fetch::ApiClient;

pub use session::*;
pub use types::*;

/// Client for the authentication endpoints
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Sign in with email and password.
    ///
    /// On success the session (token, admin, city) is stored and every
    /// subsequent request carries the bearer token. Login failures come
    /// back as [`Error::Api`]; a 401 here never clears an existing
    /// session, only the global interceptor does that.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, Error> {
        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());
        body.insert("password".to_string(), password.to_string());

        let response = self
            .api
            .post("/auth/login")
            .public()
            .json(&body)?
            .execute::<LoginResponse>()
            .await?;

        self.api
            .session()
            .login(&response.access_token, response.admin.clone(), response.city.clone());

        Ok(response)
    }

    /// Sign out, clearing the session and persisted auth state
    pub fn logout(&self) {
        self.api.session().logout();
    }
}

//! City profile and settings endpoints.

use serde_json::json;

use crate::auth::City;
use crate::error::Error;
use crate::fetch::ApiClient;

use super::types::CitySettings;

/// Client for the admin's own city: `/city-settings`, `/city/me` and
/// `/city/logo`.
#[derive(Clone)]
pub struct CityClient {
    api: ApiClient,
}

impl CityClient {
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the city settings blob. Missing or partial rows come back
    /// filled with defaults.
    pub async fn settings(&self) -> Result<CitySettings, Error> {
        self.api.get("/city-settings").execute().await
    }

    /// Replace the city settings blob
    pub async fn save_settings(&self, settings: &CitySettings) -> Result<(), Error> {
        self.api
            .put("/city-settings")
            .json(settings)?
            .execute_empty()
            .await
    }

    /// Fetch the authenticated admin's city profile
    pub async fn me(&self) -> Result<City, Error> {
        self.api.get("/city/me").execute().await
    }

    /// Update the city logo. Persists the new URL in the session's city
    /// so the host UI reflects it without a reload; `None` clears it.
    pub async fn update_logo(&self, logo_url: Option<&str>) -> Result<(), Error> {
        self.api
            .put("/city/logo")
            .json(&json!({ "logo_url": logo_url }))?
            .execute_empty()
            .await?;
        let next = logo_url.map(str::to_string);
        self.api.session().update_city(|city| {
            city.logo_url = next;
        });
        Ok(())
    }

    /// List all cities (read-only, used by cross-city pickers)
    pub async fn cities(&self) -> Result<Vec<City>, Error> {
        self.api.get("/cities").execute().await
    }
}

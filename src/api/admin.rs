//! Superadmin endpoints: cities and admin accounts.

use serde::Serialize;

use crate::auth::{AdminAccount, City};
use crate::editor::EntityId;
use crate::error::Error;
use crate::fetch::ApiClient;

/// Payload for creating a city
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewCity {
    pub name: String,
    pub slug: String,
}

/// Payload for creating an admin account
#[derive(Debug, Clone, Serialize)]
pub struct NewAdmin {
    pub email: String,
    pub password: String,
    pub city_id: EntityId,
    pub role: String,
}

/// Client for `/admin/*`. Every endpoint answers 403 unless the caller
/// is a superadmin; that surfaces as `Error::Api`.
#[derive(Clone)]
pub struct AdminClient {
    api: ApiClient,
}

impl AdminClient {
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn cities(&self) -> Result<Vec<City>, Error> {
        self.api.get("/admin/cities").execute().await
    }

    pub async fn create_city(&self, city: &NewCity) -> Result<City, Error> {
        self.api
            .post("/admin/cities")
            .json(city)?
            .execute()
            .await
    }

    pub async fn admins(&self) -> Result<Vec<AdminAccount>, Error> {
        self.api.get("/admin/admins").execute().await
    }

    pub async fn create_admin(&self, admin: &NewAdmin) -> Result<AdminAccount, Error> {
        self.api
            .post("/admin/admins")
            .json(admin)?
            .execute()
            .await
    }

    pub async fn delete_admin(&self, id: &EntityId) -> Result<(), Error> {
        self.api
            .delete(&format!("/admin/admins/{id}"))
            .execute_empty()
            .await
    }
}

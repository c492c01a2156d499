//! Generic CRUD client over one REST resource path, and its adapter into
//! the entity editor.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::editor::{Entity, EntityId, EntityOps, FormModel};
use crate::error::Error;
use crate::fetch::ApiClient;

/// Typed CRUD over one collection path (`/news`, `/events`, ...).
///
/// Every resource of the dashboard API follows the same shape; the type
/// parameter picks the record model.
pub struct ResourceClient<T> {
    api: ApiClient,
    path: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            path: self.path,
            _marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> ResourceClient<T> {
    pub(crate) fn new(api: ApiClient, path: &'static str) -> Self {
        Self {
            api,
            path,
            _marker: PhantomData,
        }
    }

    /// Fetch the full collection
    pub async fn list(&self) -> Result<Vec<T>, Error> {
        self.api.get(self.path).execute().await
    }

    /// Fetch one record by id
    pub async fn get(&self, id: &EntityId) -> Result<T, Error> {
        self.api
            .get(&format!("{}/{id}", self.path))
            .execute()
            .await
    }

    /// Create a record
    pub async fn create<B: Serialize>(&self, body: &B) -> Result<T, Error> {
        self.api.post(self.path).json(body)?.execute().await
    }

    /// Update a record
    pub async fn update<B: Serialize>(&self, id: &EntityId, body: &B) -> Result<T, Error> {
        self.api
            .put(&format!("{}/{id}", self.path))
            .json(body)?
            .execute()
            .await
    }

    /// Delete a record
    pub async fn delete(&self, id: &EntityId) -> Result<(), Error> {
        self.api
            .delete(&format!("{}/{id}", self.path))
            .execute_empty()
            .await
    }
}

/// [`EntityOps`] over a [`ResourceClient`]: the standard wiring every
/// dashboard page uses to drive an `EntityEditor`. The form shape is
/// serialized as the request body as-is.
pub struct RemoteEntityOps<T, F> {
    resource: ResourceClient<T>,
    _form: PhantomData<fn() -> F>,
}

impl<T: DeserializeOwned, F> RemoteEntityOps<T, F> {
    pub fn new(resource: ResourceClient<T>) -> Self {
        Self {
            resource,
            _form: PhantomData,
        }
    }
}

#[async_trait]
impl<T, F> EntityOps for RemoteEntityOps<T, F>
where
    T: Entity + Clone + Send + Sync + DeserializeOwned + 'static,
    F: FormModel + Serialize + Sync,
{
    type Item = T;
    type Form = F;

    async fn fetch_all(&self) -> Result<Vec<T>, Error> {
        self.resource.list().await
    }

    async fn create(&self, form: &F) -> Result<(), Error> {
        self.resource.create(form).await?;
        Ok(())
    }

    async fn update(&self, id: &EntityId, form: &F) -> Result<(), Error> {
        self.resource.update(id, form).await?;
        Ok(())
    }

    async fn delete(&self, id: &EntityId) -> Result<(), Error> {
        self.resource.delete(id).await
    }
}

//! File uploads (images and city logos).

use reqwest::multipart::{Form, Part};

use crate::error::Error;
use crate::fetch::ApiClient;

use super::types::UploadResponse;

/// Client for `/uploads/*`. Files go up as a multipart `file` part; the
/// server answers with the public URL of the stored file.
#[derive(Clone)]
pub struct UploadsClient {
    api: ApiClient,
}

impl UploadsClient {
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upload a content image
    pub async fn image(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse, Error> {
        self.upload("/uploads/image", file_name, bytes).await
    }

    /// Upload a city logo
    pub async fn logo(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse, Error> {
        self.upload("/uploads/logo", file_name, bytes).await
    }

    async fn upload(
        &self,
        path: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, Error> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        self.api.post(path).multipart(form).execute().await
    }
}

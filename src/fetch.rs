//! HTTP request plumbing shared by every CityHall API client

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{multipart, Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use crate::auth::AuthSession;
use crate::error::Error;

/// Low-level client carrying the base URL, HTTP client and session.
///
/// Attaches `Authorization: Bearer <token>` to every request when a token
/// is present, and handles the global 401 interception: any authenticated
/// endpoint answering 401 clears the persisted session so the host
/// application re-evaluates authentication from empty storage.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    session: Arc<AuthSession>,
}

impl ApiClient {
    pub(crate) fn new(base_url: &str, client: Client, session: Arc<AuthSession>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            session,
        }
    }

    pub(crate) fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    /// Create a GET request
    pub(crate) fn get(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::GET)
    }

    /// Create a POST request
    pub(crate) fn post(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::POST)
    }

    /// Create a PUT request
    pub(crate) fn put(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::PUT)
    }

    /// Create a DELETE request
    pub(crate) fn delete(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::DELETE)
    }
}

/// Helper for building and executing a single HTTP request
pub struct FetchBuilder<'a> {
    api: &'a ApiClient,
    path: String,
    method: Method,
    headers: HeaderMap,
    query_params: HashMap<String, String>,
    body: Option<Vec<u8>>,
    form: Option<multipart::Form>,
    public: bool,
}

impl<'a> FetchBuilder<'a> {
    fn new(api: &'a ApiClient, path: &str, method: Method) -> Self {
        Self {
            api,
            path: path.to_string(),
            method,
            headers: HeaderMap::new(),
            query_params: HashMap::new(),
            body: None,
            form: None,
            public: false,
        }
    }

    /// Mark the request as unauthenticated: no bearer token is attached
    /// and a 401 answer does not clear the session (login, public forms).
    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    /// Add a header to the request
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add a query parameter to the request
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query_params.insert(key.to_string(), value.to_string());
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(body)?;
        self.body = Some(json);
        self.headers
            .insert("Content-Type", HeaderValue::from_static("application/json"));
        Ok(self)
    }

    /// Add a multipart body to the request.
    ///
    /// No Content-Type is forced here: reqwest must set the multipart
    /// boundary itself, otherwise the server never receives the file.
    pub fn multipart(mut self, form: multipart::Form) -> Self {
        self.form = Some(form);
        self
    }

    async fn send(self) -> Result<reqwest::Response, Error> {
        let mut url = Url::parse(&format!("{}{}", self.api.base_url, self.path))?;

        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        let mut req = self.api.client.request(self.method.clone(), url.as_str());
        req = req.headers(self.headers.clone());

        if !self.public {
            if let Some(token) = self.api.session.token() {
                req = req.bearer_auth(token);
            }
        }

        if let Some(body) = self.body {
            req = req.body(body);
        } else if let Some(form) = self.form {
            req = req.multipart(form);
        }

        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 401 && !self.public {
            log::warn!("401 on {}: clearing persisted session", self.path);
            self.api.session.logout();
            return Err(Error::Unauthorized);
        }

        let message = read_error_body(response).await;
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T, Error> {
        let response = self.send().await?;
        let result = response.json::<T>().await?;
        Ok(result)
    }

    /// Execute the request, discarding the response body
    pub async fn execute_empty(self) -> Result<(), Error> {
        self.send().await?;
        Ok(())
    }
}

/// Extract the server's `{"error": "..."}` message from a failed response.
async fn read_error_body(response: reqwest::Response) -> Option<String> {
    let text = response.text().await.ok()?;
    if let Ok(body) = serde_json::from_str::<serde_json::Value>(&text) {
        if let Some(message) = body.get("error").and_then(|v| v.as_str()) {
            return Some(message.to_string());
        }
    }
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

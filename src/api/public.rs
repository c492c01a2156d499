//! The unauthenticated public registration endpoints.

use serde_json::json;

use crate::error::Error;
use crate::fetch::ApiClient;
use crate::forms::Answers;

use super::types::{RegistrationForm, SubmissionReceipt};

/// Wording when the server refuses a submission for lack of places
pub const CAPACITY_MESSAGE: &str = "Complet: la capacité est atteinte.";

/// Client for `/public/registration-forms/*`.
///
/// All requests are unauthenticated: no bearer token is attached and a
/// 401 never clears an admin session open in the same process.
#[derive(Clone)]
pub struct PublicFormsClient {
    api: ApiClient,
}

impl PublicFormsClient {
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch a published public form by city and form slug
    pub async fn get(&self, city_slug: &str, form_slug: &str) -> Result<RegistrationForm, Error> {
        self.api
            .get(&format!("/public/registration-forms/{city_slug}/{form_slug}"))
            .public()
            .execute()
            .await
    }

    /// Submit answers to a public form.
    ///
    /// `persons_count` only matters when the form counts capacity in
    /// persons; otherwise it is forced to 1 so a stale client cannot
    /// consume more places than it shows. A full form (HTTP 409) maps to
    /// [`Error::CapacityReached`] so hosts can word it distinctly from a
    /// generic failure.
    pub async fn submit(
        &self,
        city_slug: &str,
        form_slug: &str,
        form: &RegistrationForm,
        answers: &Answers,
        persons_count: i64,
    ) -> Result<SubmissionReceipt, Error> {
        let persons_count = if form.capacity_mode() == "PERSONS" {
            persons_count.max(1)
        } else {
            1
        };
        let body = json!({
            "data": answers,
            "persons_count": persons_count,
        });
        let result = self
            .api
            .post(&format!(
                "/public/registration-forms/{city_slug}/{form_slug}/submissions"
            ))
            .public()
            .json(&body)?
            .execute()
            .await;
        match result {
            Err(Error::Api { status: 409, .. }) => Err(Error::CapacityReached),
            other => other,
        }
    }
}

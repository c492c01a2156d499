//! Typed clients for every dashboard resource, all built on the shared
//! HTTP plumbing in [`crate::fetch`].

mod admin;
mod city;
mod public;
mod registration;
mod resources;
mod types;
mod uploads;

pub use admin::{AdminClient, NewAdmin, NewCity};
pub use city::CityClient;
pub use public::{PublicFormsClient, CAPACITY_MESSAGE};
pub use registration::{
    unique_public_slug, FormTemplatesClient, RegistrationFormDraft, RegistrationFormsClient,
    TemplateDraft,
};
pub use resources::{RemoteEntityOps, ResourceClient};
pub use types::{
    Annoucement, AnnoucementDraft, CityContacts, CitySettings, Event, EventDraft, FormTemplate,
    News, NewsDraft, OpeningHours, Poll, PollDraft, PollOption, RegistrationForm, Report,
    ReportUpdate, Submission, SubmissionReceipt, UploadResponse, UserAccount,
};
pub use uploads::UploadsClient;

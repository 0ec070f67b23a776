//! The storage collaborator.
//!
//! Authentication, transport and persistence live behind [`FormStore`]. The
//! engine never enforces access rules itself; it only reacts to the
//! failures a store reports.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{Form, FormDetail, FormInput, Question, QuestionId, QuestionInput, Response, Submission};

/// Failures a store can report.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The acting user may not see or answer this form.
    #[error("Access forbidden")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    /// The form accepts one response per user and this user already sent one.
    #[error("Response already submitted")]
    AlreadySubmitted,

    /// The store refused the input (e.g. a duplicate slug).
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Everything the engine needs from persistence.
#[async_trait]
pub trait FormStore: Send + Sync {
    /// The forms visible in the catalog.
    async fn list_forms(&self) -> Result<Vec<Form>, StoreError>;

    /// A form with its questions.
    async fn get_form(&self, slug: &str) -> Result<FormDetail, StoreError>;

    async fn create_form(&self, input: FormInput) -> Result<Form, StoreError>;

    /// Append a question; the store assigns its id.
    async fn add_question(&self, slug: &str, input: QuestionInput) -> Result<Question, StoreError>;

    async fn remove_question(&self, slug: &str, id: QuestionId) -> Result<(), StoreError>;

    /// Every stored response, unfiltered.
    async fn list_responses(&self, slug: &str) -> Result<Vec<Response>, StoreError>;

    async fn submit_response(&self, slug: &str, submission: Submission) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: FormStore + ?Sized> FormStore for Arc<T> {
    async fn list_forms(&self) -> Result<Vec<Form>, StoreError> {
        (**self).list_forms().await
    }

    async fn get_form(&self, slug: &str) -> Result<FormDetail, StoreError> {
        (**self).get_form(slug).await
    }

    async fn create_form(&self, input: FormInput) -> Result<Form, StoreError> {
        (**self).create_form(input).await
    }

    async fn add_question(&self, slug: &str, input: QuestionInput) -> Result<Question, StoreError> {
        (**self).add_question(slug, input).await
    }

    async fn remove_question(&self, slug: &str, id: QuestionId) -> Result<(), StoreError> {
        (**self).remove_question(slug, id).await
    }

    async fn list_responses(&self, slug: &str) -> Result<Vec<Response>, StoreError> {
        (**self).list_responses(slug).await
    }

    async fn submit_response(&self, slug: &str, submission: Submission) -> Result<(), StoreError> {
        (**self).submit_response(slug, submission).await
    }
}

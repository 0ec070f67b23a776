//! In-memory form store for tests and demos.
//!
//! `MemoryStore` plays the collaborator's part without any I/O. It assigns
//! ids, keeps question order, and applies the access policy a real backend
//! would: allowed e-mail domains, one response per user, and creator-only
//! authoring and response listing.
//!
//! # Example
//!
//! ```rust,ignore
//! use formulary::{FormDetail, MemoryStore, Respondent};
//!
//! let store = MemoryStore::new(Respondent::new(1, "Ada", "ada@web.tech"))
//!     .with_form(FormDetail::new(1, "Lunch", "lunch"));
//!
//! store.set_respondent(Respondent::new(2, "Bob", "bob@web.tech"));
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
    Form, FormDetail, FormInput, FormStore, Question, QuestionId, QuestionInput, Respondent,
    Response, StoreError, Submission,
};

/// A [`FormStore`] backed by plain collections behind a mutex.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    forms: Vec<FormDetail>,
    responses: HashMap<String, Vec<Response>>,
    respondent: Respondent,
    next_form_id: i64,
    next_question_id: i64,
    fail_next: Option<String>,
}

impl MemoryStore {
    /// Create an empty store acting as `respondent`.
    pub fn new(respondent: Respondent) -> Self {
        Self {
            inner: Mutex::new(Inner {
                forms: Vec::new(),
                responses: HashMap::new(),
                respondent,
                next_form_id: 1,
                next_question_id: 1,
                fail_next: None,
            }),
        }
    }

    /// Seed a form. Id counters move past the form's ids.
    pub fn with_form(self, form: FormDetail) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.next_form_id = inner.next_form_id.max(form.id + 1);
            let max_question = form.questions.iter().map(|q| q.id().get()).max().unwrap_or(0);
            inner.next_question_id = inner.next_question_id.max(max_question + 1);
            inner.forms.push(form);
        }
        self
    }

    /// Seed stored responses for a form.
    pub fn with_responses(self, slug: impl Into<String>, responses: Vec<Response>) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.responses.entry(slug.into()).or_default().extend(responses);
        }
        self
    }

    /// Builder form of [`set_respondent`](Self::set_respondent).
    pub fn acting_as(self, respondent: Respondent) -> Self {
        self.set_respondent(respondent);
        self
    }

    /// Switch the user subsequent calls are made as.
    pub fn set_respondent(&self, respondent: Respondent) {
        if let Ok(mut inner) = self.inner.lock() {
            debug!(user = %respondent.email, "Acting as new respondent");
            inner.respondent = respondent;
        }
    }

    /// Make the next call fail with a backend error.
    pub fn fail_next(&self, message: impl Into<String>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_next = Some(message.into());
        }
    }

    /// Number of stored responses for a form.
    pub fn response_count(&self, slug: &str) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.responses.get(slug).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::Backend(anyhow!("memory store lock poisoned")))?;
        if let Some(message) = inner.fail_next.take() {
            warn!(%message, "Injected store failure");
            return Err(StoreError::Backend(anyhow!(message)));
        }
        Ok(inner)
    }
}

impl Inner {
    fn form(&self, slug: &str) -> Result<&FormDetail, StoreError> {
        self.forms
            .iter()
            .find(|f| f.slug == slug)
            .ok_or_else(|| StoreError::NotFound(format!("form '{slug}'")))
    }

    fn form_mut(&mut self, slug: &str) -> Result<&mut FormDetail, StoreError> {
        self.forms
            .iter_mut()
            .find(|f| f.slug == slug)
            .ok_or_else(|| StoreError::NotFound(format!("form '{slug}'")))
    }

    fn is_creator(&self, form: &FormDetail) -> bool {
        form.creator_id == self.respondent.id
    }

    /// Creators always pass; everyone else needs an allowed e-mail domain
    /// when the form restricts them.
    fn may_answer(&self, form: &FormDetail) -> bool {
        if self.is_creator(form) || form.allowed_domains.is_empty() {
            return true;
        }
        self.respondent.email_domain().is_some_and(|domain| {
            form.allowed_domains
                .iter()
                .any(|allowed| allowed.trim().eq_ignore_ascii_case(&domain))
        })
    }

    fn require_creator(&self, slug: &str) -> Result<(), StoreError> {
        let form = self.form(slug)?;
        if self.is_creator(form) {
            Ok(())
        } else {
            Err(StoreError::Forbidden)
        }
    }
}

#[async_trait]
impl FormStore for MemoryStore {
    async fn list_forms(&self) -> Result<Vec<Form>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.forms.iter().map(FormDetail::summary).collect())
    }

    async fn get_form(&self, slug: &str) -> Result<FormDetail, StoreError> {
        let inner = self.lock()?;
        let form = inner.form(slug)?;
        if !inner.may_answer(form) {
            return Err(StoreError::Forbidden);
        }
        Ok(form.clone())
    }

    async fn create_form(&self, input: FormInput) -> Result<Form, StoreError> {
        let mut inner = self.lock()?;
        input
            .validate()
            .map_err(|e| StoreError::Rejected(e.to_string()))?;
        if inner.forms.iter().any(|f| f.slug == input.slug) {
            return Err(StoreError::Rejected(
                "The slug has already been taken.".to_string(),
            ));
        }

        let id = inner.next_form_id;
        inner.next_form_id += 1;

        let mut form = FormDetail::new(id, input.name.trim(), input.slug.as_str())
            .with_description(input.description.as_str())
            .limited_to_one_response(input.limit_one_response);
        form.allowed_domains = input.normalized_domains();
        form.creator_id = inner.respondent.id;

        info!(slug = %form.slug, id, "Created form");
        let summary = form.summary();
        inner.forms.push(form);
        Ok(summary)
    }

    async fn add_question(&self, slug: &str, input: QuestionInput) -> Result<Question, StoreError> {
        let mut inner = self.lock()?;
        inner.require_creator(slug)?;

        let id = QuestionId::new(inner.next_question_id);
        let question = input
            .into_question(id)
            .map_err(|e| StoreError::Rejected(e.to_string()))?;
        inner.next_question_id += 1;

        inner.form_mut(slug)?.questions.push(question.clone());
        debug!(slug, %id, name = %question.name(), "Added question");
        Ok(question)
    }

    async fn remove_question(&self, slug: &str, id: QuestionId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.require_creator(slug)?;

        let form = inner.form_mut(slug)?;
        let position = form
            .questions
            .iter()
            .position(|q| q.id() == id)
            .ok_or_else(|| StoreError::NotFound(format!("question {id}")))?;
        let removed = form.questions.remove(position);
        debug!(slug, %id, name = %removed.name(), "Removed question");
        Ok(())
    }

    async fn list_responses(&self, slug: &str) -> Result<Vec<Response>, StoreError> {
        let inner = self.lock()?;
        inner.require_creator(slug)?;
        Ok(inner.responses.get(slug).cloned().unwrap_or_default())
    }

    async fn submit_response(&self, slug: &str, submission: Submission) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let form = inner.form(slug)?;
        if !inner.may_answer(form) {
            return Err(StoreError::Forbidden);
        }

        let user = inner.respondent.clone();
        if form.limit_one_response
            && inner
                .responses
                .get(slug)
                .is_some_and(|stored| stored.iter().any(|r| r.user.id == user.id))
        {
            return Err(StoreError::AlreadySubmitted);
        }

        // Stored under the question name as it is right now.
        let mut response = Response::new(Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(), user);
        for answer in &submission.answers {
            match form.question(answer.question_id) {
                Some(question) => {
                    response
                        .answers
                        .insert(question.name().to_string(), answer.value().to_string());
                }
                None => {
                    debug!(slug, id = %answer.question_id, "Dropping answer for unknown question")
                }
            }
        }

        inner.responses.entry(slug.to_string()).or_default().push(response);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnswerType, SubmittedAnswer};

    fn owner() -> Respondent {
        Respondent::new(1, "Owner", "owner@web.tech")
    }

    fn guest() -> Respondent {
        Respondent::new(2, "Guest", "guest@elsewhere.org")
    }

    fn restricted() -> FormDetail {
        let mut form = FormDetail::new(7, "Internal", "internal")
            .with_allowed_domain("web.tech")
            .with_questions(vec![
                Question::plain(3, "Name", AnswerType::ShortText, true).unwrap(),
            ]);
        form.creator_id = 1;
        form
    }

    fn answer(id: i64, value: &str) -> Submission {
        Submission {
            answers: vec![SubmittedAnswer {
                question_id: QuestionId::new(id),
                value: Some(value.to_string()),
            }],
        }
    }

    #[tokio::test]
    async fn seeding_moves_id_counters() {
        let store = MemoryStore::new(owner()).with_form(restricted());
        let form = store.create_form(FormInput::new("Next", "next")).await.unwrap();
        assert_eq!(form.id, 8);
        let q = store
            .add_question("next", QuestionInput::new("Q", AnswerType::Date))
            .await
            .unwrap();
        assert_eq!(q.id(), QuestionId::new(4));
    }

    #[tokio::test]
    async fn domain_restriction() {
        let store = MemoryStore::new(guest()).with_form(restricted());
        assert!(matches!(store.get_form("internal").await, Err(StoreError::Forbidden)));
        assert!(matches!(
            store.submit_response("internal", answer(3, "x")).await,
            Err(StoreError::Forbidden)
        ));

        store.set_respondent(Respondent::new(3, "Colleague", "c@WEB.tech"));
        assert!(store.get_form("internal").await.is_ok());
    }

    #[tokio::test]
    async fn domain_match_ignores_case() {
        let mut seeded = restricted();
        seeded.allowed_domains = ["WebTech.ID".to_string()].into();
        seeded.slug = "mixed".into();
        let store = MemoryStore::new(Respondent::new(2, "Ada", "ada@webtech.id"))
            .with_form(seeded)
            .with_form(
                FormDetail::new(8, "Builder", "builder").with_allowed_domain(" WebTech.id "),
            );
        assert!(store.get_form("mixed").await.is_ok());
        assert!(store.get_form("builder").await.is_ok());
    }

    #[tokio::test]
    async fn one_response_per_user() {
        let store = MemoryStore::new(owner()).with_form(restricted().limited_to_one_response(true));
        store.submit_response("internal", answer(3, "first")).await.unwrap();
        assert!(matches!(
            store.submit_response("internal", answer(3, "again")).await,
            Err(StoreError::AlreadySubmitted)
        ));
        assert_eq!(store.response_count("internal"), 1);
    }

    #[tokio::test]
    async fn answers_are_stored_by_name() {
        let store = MemoryStore::new(owner()).with_form(restricted());
        let mut submission = answer(3, "Ada");
        submission.answers.push(SubmittedAnswer {
            question_id: QuestionId::new(99),
            value: Some("stray".into()),
        });
        store.submit_response("internal", submission).await.unwrap();

        let responses = store.list_responses("internal").await.unwrap();
        assert_eq!(responses[0].answer("Name"), Some("Ada"));
        assert_eq!(responses[0].answers.len(), 1);
    }

    #[tokio::test]
    async fn authoring_is_creator_only() {
        let store = MemoryStore::new(guest()).with_form(restricted());
        assert!(matches!(
            store
                .add_question("internal", QuestionInput::new("Q", AnswerType::ShortText))
                .await,
            Err(StoreError::Forbidden)
        ));
        assert!(matches!(store.list_responses("internal").await, Err(StoreError::Forbidden)));
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() {
        let store = MemoryStore::new(owner()).with_form(restricted());
        let error = store
            .create_form(FormInput::new("Other", "internal"))
            .await
            .unwrap_err();
        assert!(matches!(error, StoreError::Rejected(_)));
    }

    #[tokio::test]
    async fn injected_failure_hits_once() {
        let store = MemoryStore::new(owner()).with_form(restricted());
        store.fail_next("connection reset");
        let error = store.list_forms().await.unwrap_err();
        assert_eq!(error.to_string(), "connection reset");
        assert_eq!(store.list_forms().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn removing_unknown_question_is_not_found() {
        let store = MemoryStore::new(owner()).with_form(restricted());
        assert!(matches!(
            store.remove_question("internal", QuestionId::new(42)).await,
            Err(StoreError::NotFound(_))
        ));
        store.remove_question("internal", QuestionId::new(3)).await.unwrap();
        assert!(store.get_form("internal").await.unwrap().is_empty());
    }
}

//! A respondent filling in one form.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::{
    AnswerState, AnswerValue, FieldEvent, FieldView, FormDetail, FormStatus, FormStore, FormView,
    InputError, QuestionId, StoreError, ValidationError, validation,
};

/// Shared view of a session's lifecycle.
///
/// Cloneable so a UI can show a busy indicator or report that the user
/// navigated away while a request is outstanding. Sessions opened with the
/// same handle share its in-flight flag.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    in_flight: Arc<AtomicBool>,
    left: Arc<AtomicBool>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a load or submit is outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Mark the session as abandoned. Outstanding requests still run to
    /// completion but their outcome is ignored.
    pub fn leave(&self) {
        self.left.store(true, Ordering::Release);
    }

    pub fn has_left(&self) -> bool {
        self.left.load(Ordering::Acquire)
    }

    fn begin(&self) -> Option<InFlight> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(Arc::clone(&self.in_flight)))
    }
}

/// Clears the in-flight flag when dropped.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Failures while loading a form.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("You are not allowed to access this form.")]
    Forbidden,

    #[error("Form not found: {0}")]
    NotFound(String),

    #[error("Another request is still in progress.")]
    InFlight,

    #[error("Failed to load form")]
    Collaborator(#[source] StoreError),
}

impl From<StoreError> for SessionError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Forbidden => Self::Forbidden,
            StoreError::NotFound(what) => Self::NotFound(what),
            other => Self::Collaborator(other),
        }
    }
}

/// Failures on submit. The answer state is kept in every case.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("You are not allowed to access this form.")]
    Forbidden,

    #[error("You already submitted this form.")]
    AlreadySubmitted,

    #[error("Failed to submit form.")]
    Collaborator(#[source] StoreError),

    #[error("Another request is still in progress.")]
    InFlight,

    #[error("This session is closed.")]
    Closed,
}

impl SubmitError {
    /// The respondent should be sent to a "forbidden" page.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden)
    }

    /// Retrying the same submit cannot succeed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Forbidden | Self::AlreadySubmitted | Self::Closed)
    }
}

impl From<StoreError> for SubmitError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Forbidden => Self::Forbidden,
            StoreError::AlreadySubmitted => Self::AlreadySubmitted,
            other => Self::Collaborator(other),
        }
    }
}

/// What became of a dispatched submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored by the collaborator.
    Submitted,
    /// The session was left while the request ran; its result was dropped.
    Ignored,
}

/// One respondent's pass over a form.
///
/// Owns the loaded form and the answer state. Nothing is deduplicated or
/// retried: a failed submit leaves the answers in place for the next try,
/// unless the failure is terminal, which closes the session.
pub struct RespondentSession<S> {
    store: S,
    form: FormDetail,
    answers: AnswerState,
    handle: SessionHandle,
    submitted: bool,
    closed: bool,
}

impl<S: FormStore> RespondentSession<S> {
    /// Load the form at `slug` with a fresh handle.
    pub async fn open(store: S, slug: &str) -> Result<Self, SessionError> {
        Self::open_with(store, slug, SessionHandle::new()).await
    }

    /// Load the form at `slug`, sharing an existing handle.
    pub async fn open_with(
        store: S,
        slug: &str,
        handle: SessionHandle,
    ) -> Result<Self, SessionError> {
        let guard = handle.begin().ok_or(SessionError::InFlight)?;
        let loaded = store.get_form(slug).await;
        drop(guard);

        let form = loaded.map_err(|e| {
            warn!(slug, error = %e, "Failed to load form");
            SessionError::from(e)
        })?;
        info!(slug, questions = form.len(), "Loaded form");

        Ok(Self {
            store,
            form,
            answers: AnswerState::new(),
            handle,
            submitted: false,
            closed: false,
        })
    }

    pub fn form(&self) -> &FormDetail {
        &self.form
    }

    pub fn answers(&self) -> &AnswerState {
        &self.answers
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Submitted, or refused in a way no retry can fix.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Capture views of every question with the current answers.
    pub fn fields(&self) -> Vec<FieldView> {
        FormView::capture(&self.form.questions).fields(Some(&self.answers))
    }

    /// Bind a value directly, bypassing the event contract.
    pub fn set_answer(&mut self, id: QuestionId, value: impl Into<AnswerValue>) {
        let value = value.into();
        debug!(%id, kind = value.type_name(), "Answer set");
        self.answers.set_answer(id, value);
    }

    /// Apply an input event from a rendered field.
    pub fn apply(&mut self, id: QuestionId, event: FieldEvent) -> Result<(), InputError> {
        debug!(%id, %event, "Applying field event");
        FormView::capture(&self.form.questions).apply(&mut self.answers, id, event)
    }

    pub fn status(&self) -> FormStatus {
        validation::status(&self.form.questions, &self.answers)
    }

    pub fn can_submit(&self) -> bool {
        !self.closed && self.status().can_submit()
    }

    /// Validate, then hand the answers to the store.
    ///
    /// Nothing is sent when validation fails. Once dispatched the request
    /// always completes; if the session was left meanwhile the result is
    /// dropped and [`SubmitOutcome::Ignored`] is returned.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, SubmitError> {
        if self.closed || self.handle.has_left() {
            return Err(SubmitError::Closed);
        }
        validation::validate(&self.form.questions, &self.answers)?;

        let guard = self.handle.begin().ok_or(SubmitError::InFlight)?;
        let submission = self.answers.to_submission(&self.form.questions);
        let slug = self.form.slug.as_str();
        debug!(slug, answers = submission.answers.len(), "Submitting");
        let result = self.store.submit_response(slug, submission).await;
        drop(guard);

        if self.handle.has_left() {
            debug!(slug, ok = result.is_ok(), "Session left; ignoring submit result");
            return Ok(SubmitOutcome::Ignored);
        }

        match result {
            Ok(()) => {
                info!(slug, "Form submitted");
                self.submitted = true;
                self.closed = true;
                Ok(SubmitOutcome::Submitted)
            }
            Err(e) => {
                warn!(slug, error = %e, "Submit failed");
                let error = SubmitError::from(e);
                self.closed = error.is_terminal();
                Err(error)
            }
        }
    }
}

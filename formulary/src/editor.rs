//! Authoring: creating a form, editing its questions, previewing it, and
//! reading its responses.

use tracing::{debug, info};

use crate::{
    FieldView, Form, FormDetail, FormInput, FormInputError, FormStore, FormView, Question,
    QuestionId, QuestionInput, Report, ReportOptions, SchemaError, StoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    FormInput(#[from] FormInputError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// An operator's view of one form.
///
/// The local copy is refreshed from the store after every edit, so the
/// question list always reflects what the store holds.
pub struct FormEditor<S> {
    store: S,
    form: FormDetail,
}

impl<S: FormStore> FormEditor<S> {
    /// Create a new form and open it for editing.
    pub async fn create(store: S, input: FormInput) -> Result<Self, EditorError> {
        input.validate()?;
        let created: Form = store.create_form(input).await?;
        info!(slug = %created.slug, "Form created");
        Self::open(store, &created.slug).await
    }

    pub async fn open(store: S, slug: &str) -> Result<Self, EditorError> {
        let form = store.get_form(slug).await?;
        Ok(Self { store, form })
    }

    pub fn form(&self) -> &FormDetail {
        &self.form
    }

    pub fn questions(&self) -> &[Question] {
        &self.form.questions
    }

    /// Append a question. Schema problems are caught before the store is
    /// contacted.
    pub async fn add_question(&mut self, input: QuestionInput) -> Result<Question, EditorError> {
        input.validate()?;
        let question = self.store.add_question(&self.form.slug, input).await?;
        debug!(slug = %self.form.slug, id = %question.id(), "Question added");
        self.refresh().await?;
        Ok(question)
    }

    /// Remove a question. Stored responses keep their answer for it, which
    /// the report then ignores.
    pub async fn remove_question(&mut self, id: QuestionId) -> Result<(), EditorError> {
        self.store.remove_question(&self.form.slug, id).await?;
        debug!(slug = %self.form.slug, %id, "Question removed");
        self.refresh().await
    }

    /// Read-only fields with empty values, as a respondent would first see them.
    pub fn preview(&self) -> Vec<FieldView> {
        FormView::preview(&self.form.questions).fields(None)
    }

    /// The response table for the current questions.
    pub async fn report(&self, options: &ReportOptions) -> Result<Report, EditorError> {
        let responses = self.store.list_responses(&self.form.slug).await?;
        let report = Report::build(&self.form.questions, &responses, options);
        debug!(
            slug = %self.form.slug,
            stored = responses.len(),
            retained = report.total(),
            "Built response report"
        );
        Ok(report)
    }

    /// The respondent-facing path of this form.
    pub fn share_path(&self) -> String {
        format!("/forms/{}/submit", self.form.slug)
    }

    async fn refresh(&mut self) -> Result<(), EditorError> {
        self.form = self.store.get_form(&self.form.slug).await?;
        Ok(())
    }
}

//! The rendering contract: which input a question is captured with, and how
//! input events turn into answer state mutations.
//!
//! Authoring preview and respondent capture both go through [`FormView`], so
//! they read stored values the same way. Preview mode only differs in that
//! every mutation is refused.

use std::fmt;

use crate::{
    AffordanceKind, AnswerState, AnswerType, AnswerValue, Question, QuestionId, QuestionName,
    validation,
};

/// Whether a form is being filled in or only looked at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Respondent capture: events mutate the answer state.
    #[default]
    Capture,
    /// Authoring preview: values are shown, events are refused.
    Preview,
}

impl Mode {
    pub fn is_read_only(self) -> bool {
        self == Self::Preview
    }
}

/// One option of a choice question, with its current checked state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: String,
    pub checked: bool,
}

/// The concrete input for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affordance {
    TextInput,
    DateInput,
    TextArea,
    /// Mutually exclusive options shown together.
    RadioGroup(Vec<ChoiceOption>),
    /// Mutually exclusive options in a select box.
    Select(Vec<ChoiceOption>),
    /// Independent per-option toggles.
    CheckboxGroup(Vec<ChoiceOption>),
}

impl Affordance {
    /// The options of a choice affordance (empty for text inputs).
    pub fn options(&self) -> &[ChoiceOption] {
        match self {
            Self::TextInput | Self::DateInput | Self::TextArea => &[],
            Self::RadioGroup(options) | Self::Select(options) | Self::CheckboxGroup(options) => {
                options
            }
        }
    }
}

/// Everything needed to draw one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub id: QuestionId,
    pub name: QuestionName,
    /// 1-based position in the form.
    pub position: usize,
    pub answer_type: AnswerType,
    pub required: bool,
    /// Whether the question currently passes validation.
    pub valid: bool,
    pub read_only: bool,
    pub affordance: Affordance,
    /// The bound value, interpreted through the question type.
    pub value: AnswerValue,
}

impl FieldView {
    /// The value as text, e.g. for an input's `value` attribute.
    pub fn display_value(&self) -> String {
        self.value.encode()
    }
}

/// Build the view of a single question.
///
/// Without an answer state (e.g. when previewing a fresh form) every
/// question shows its empty value.
pub fn field_view(
    question: &Question,
    state: Option<&AnswerState>,
    mode: Mode,
    position: usize,
) -> FieldView {
    let value = match state {
        Some(state) => state.answer_for(question),
        None => question.empty_answer(),
    };
    let valid = match state {
        Some(state) => validation::is_valid(question, state),
        None => !question.is_required(),
    };

    let options = || -> Vec<ChoiceOption> {
        question
            .choices()
            .iter()
            .map(|choice| ChoiceOption {
                label: choice.clone(),
                checked: is_checked(&value, choice),
            })
            .collect()
    };

    let affordance = match question.answer_type().affordance() {
        AffordanceKind::TextInput => Affordance::TextInput,
        AffordanceKind::DateInput => Affordance::DateInput,
        AffordanceKind::TextArea => Affordance::TextArea,
        AffordanceKind::RadioGroup => Affordance::RadioGroup(options()),
        AffordanceKind::Select => Affordance::Select(options()),
        AffordanceKind::CheckboxGroup => Affordance::CheckboxGroup(options()),
    };

    FieldView {
        id: question.id(),
        name: question.name().clone(),
        position,
        answer_type: question.answer_type(),
        required: question.is_required(),
        valid,
        read_only: mode.is_read_only(),
        affordance,
        value,
    }
}

fn is_checked(value: &AnswerValue, choice: &str) -> bool {
    match value {
        AnswerValue::Text(text) => text.trim() == choice,
        AnswerValue::Selection(selection) => selection.contains(choice),
    }
}

/// An input event coming from a rendered field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// The full new content of a text, paragraph or date input.
    Edit(String),
    /// A choice picked in a radio group or select box; empty clears it.
    Select(String),
    /// A checkbox flipped.
    Toggle(String),
}

impl FieldEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Edit(_) => "edit",
            Self::Select(_) => "select",
            Self::Toggle(_) => "toggle",
        }
    }
}

impl fmt::Display for FieldEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Errors for events that cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Form is read-only")]
    ReadOnly,

    #[error("No question with id {0}")]
    UnknownQuestion(QuestionId),

    #[error("'{choice}' is not a choice of '{question}'")]
    UnknownChoice {
        question: QuestionName,
        choice: String,
    },

    #[error("'{answer_type}' questions do not accept {event} events")]
    UnsupportedEvent {
        answer_type: AnswerType,
        event: &'static str,
    },
}

/// A form's questions rendered in one mode.
#[derive(Debug, Clone, Copy)]
pub struct FormView<'a> {
    questions: &'a [Question],
    mode: Mode,
}

impl<'a> FormView<'a> {
    pub fn new(questions: &'a [Question], mode: Mode) -> Self {
        Self { questions, mode }
    }

    /// Respondent capture.
    pub fn capture(questions: &'a [Question]) -> Self {
        Self::new(questions, Mode::Capture)
    }

    /// Read-only authoring preview.
    pub fn preview(questions: &'a [Question]) -> Self {
        Self::new(questions, Mode::Preview)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn questions(&self) -> &'a [Question] {
        self.questions
    }

    /// Views for every question, in form order.
    pub fn fields(&self, state: Option<&AnswerState>) -> Vec<FieldView> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| field_view(question, state, self.mode, index + 1))
            .collect()
    }

    /// Apply an input event to the answer state.
    pub fn apply(
        &self,
        state: &mut AnswerState,
        id: QuestionId,
        event: FieldEvent,
    ) -> Result<(), InputError> {
        if self.mode.is_read_only() {
            return Err(InputError::ReadOnly);
        }
        let question = self
            .questions
            .iter()
            .find(|q| q.id() == id)
            .ok_or(InputError::UnknownQuestion(id))?;
        apply_event(question, state, event)
    }
}

/// Apply an event to one question's binding.
///
/// Text, paragraph and date inputs overwrite the whole value. Radio groups
/// and select boxes replace it with the picked choice. Checkbox groups
/// toggle one option in the decoded selection.
pub fn apply_event(
    question: &Question,
    state: &mut AnswerState,
    event: FieldEvent,
) -> Result<(), InputError> {
    let unsupported = |event: &FieldEvent| InputError::UnsupportedEvent {
        answer_type: question.answer_type(),
        event: event.kind(),
    };

    match question.answer_type() {
        AnswerType::ShortText | AnswerType::LongText | AnswerType::Date => match event {
            FieldEvent::Edit(value) => {
                state.set_answer(question.id(), value);
                Ok(())
            }
            other => Err(unsupported(&other)),
        },
        AnswerType::SingleChoice | AnswerType::Dropdown => match event {
            FieldEvent::Select(choice) => {
                let choice = choice.trim();
                if !choice.is_empty() && !question.has_choice(choice) {
                    return Err(unknown_choice(question, choice));
                }
                state.set_answer(question.id(), choice);
                Ok(())
            }
            other => Err(unsupported(&other)),
        },
        AnswerType::MultiChoice => match event {
            FieldEvent::Toggle(choice) => {
                if !question.has_choice(&choice) {
                    return Err(unknown_choice(question, choice.trim()));
                }
                state.toggle_choice(question, &choice);
                Ok(())
            }
            other => Err(unsupported(&other)),
        },
    }
}

fn unknown_choice(question: &Question, choice: &str) -> InputError {
    InputError::UnknownChoice {
        question: question.name().clone(),
        choice: choice.to_string(),
    }
}

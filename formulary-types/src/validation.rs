//! Submission gating.
//!
//! Every function here recomputes from scratch over the question list. That
//! is linear in the number of questions and cheap enough to run after each
//! answer change, so nothing is cached.

use crate::{AnswerState, Question, QuestionName};

/// Why a submission is blocked. The answer state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please answer the required questions: {}", join_names(.0))]
    MissingRequired(Vec<QuestionName>),

    #[error("Answer at least one question before submitting")]
    NothingAnswered,
}

/// A question is valid unless it is required and unanswered.
pub fn is_valid(question: &Question, state: &AnswerState) -> bool {
    !question.is_required() || state.is_answered(question)
}

/// Whether any question of the form has a non-empty answer.
pub fn has_any_answer(questions: &[Question], state: &AnswerState) -> bool {
    questions.iter().any(|q| state.is_answered(q))
}

/// The questions currently failing [`is_valid`], in form order.
pub fn invalid_questions<'a>(questions: &'a [Question], state: &AnswerState) -> Vec<&'a Question> {
    questions.iter().filter(|q| !is_valid(q, state)).collect()
}

/// Both submission predicates for a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormStatus {
    /// Every question satisfies [`is_valid`].
    pub all_valid: bool,
    /// At least one question has a non-empty answer.
    pub any_answered: bool,
}

impl FormStatus {
    /// A form can be submitted only when both predicates hold.
    pub fn can_submit(&self) -> bool {
        self.all_valid && self.any_answered
    }
}

pub fn status(questions: &[Question], state: &AnswerState) -> FormStatus {
    FormStatus {
        all_valid: questions.iter().all(|q| is_valid(q, state)),
        any_answered: has_any_answer(questions, state),
    }
}

/// Check that the form may be submitted.
///
/// Missing required answers are reported first. A form with no answers at
/// all (including a form with no questions) is rejected even when nothing is
/// required.
pub fn validate(questions: &[Question], state: &AnswerState) -> Result<(), ValidationError> {
    let missing: Vec<QuestionName> = invalid_questions(questions, state)
        .into_iter()
        .map(|q| q.name().clone())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingRequired(missing));
    }
    if !has_any_answer(questions, state) {
        return Err(ValidationError::NothingAnswered);
    }
    Ok(())
}

fn join_names(names: &[QuestionName]) -> String {
    names
        .iter()
        .map(QuestionName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnswerType, Selection};

    fn questions() -> Vec<Question> {
        vec![
            Question::plain(1, "Name", AnswerType::ShortText, true).unwrap(),
            Question::plain(2, "Bio", AnswerType::LongText, false).unwrap(),
            Question::new(3, "Color", AnswerType::MultiChoice, true, ["Red", "Blue"]).unwrap(),
        ]
    }

    #[test]
    fn invalid_iff_required_and_empty() {
        let qs = questions();
        let mut state = AnswerState::new();

        assert!(!is_valid(&qs[0], &state));
        assert!(is_valid(&qs[1], &state));

        state.set_answer(qs[0].id(), "   ");
        assert!(!is_valid(&qs[0], &state), "whitespace-only is empty");

        state.set_answer(qs[0].id(), "Ada");
        assert!(is_valid(&qs[0], &state));

        state.set_answer(qs[2].id(), Selection::new());
        assert!(!is_valid(&qs[2], &state), "no options selected is empty");

        state.toggle_choice(&qs[2], "Blue");
        assert!(is_valid(&qs[2], &state));
    }

    #[test]
    fn all_skipped_optional_form_cannot_be_submitted() {
        let qs = vec![
            Question::plain(1, "A", AnswerType::ShortText, false).unwrap(),
            Question::plain(2, "B", AnswerType::Date, false).unwrap(),
        ];
        let mut state = AnswerState::new();
        let s = status(&qs, &state);
        assert!(s.all_valid);
        assert!(!s.any_answered);
        assert!(!s.can_submit());
        assert_eq!(validate(&qs, &state), Err(ValidationError::NothingAnswered));

        state.set_answer(qs[1].id(), "2025-01-31");
        assert!(status(&qs, &state).can_submit());
        assert_eq!(validate(&qs, &state), Ok(()));
    }

    #[test]
    fn empty_form_cannot_be_submitted() {
        let state = AnswerState::new();
        assert!(!status(&[], &state).can_submit());
        assert_eq!(validate(&[], &state), Err(ValidationError::NothingAnswered));
    }

    #[test]
    fn status_tracks_every_mutation() {
        let qs = questions();
        let mut state = AnswerState::new();
        state.set_answer(qs[0].id(), "Ada");
        assert!(!status(&qs, &state).can_submit());

        state.toggle_choice(&qs[2], "Red");
        assert!(status(&qs, &state).can_submit());

        state.toggle_choice(&qs[2], "Red");
        assert!(!status(&qs, &state).can_submit());
    }

    #[test]
    fn missing_required_names_the_questions() {
        let qs = questions();
        let mut state = AnswerState::new();
        state.set_answer(qs[1].id(), "hello");

        let error = validate(&qs, &state).unwrap_err();
        assert_eq!(
            error,
            ValidationError::MissingRequired(vec!["Name".into(), "Color".into()])
        );
        assert_eq!(
            error.to_string(),
            "Please answer the required questions: Name, Color"
        );
    }

    #[test]
    fn answers_for_unknown_ids_do_not_count() {
        let qs = questions();
        let mut state = AnswerState::new();
        state.set_answer(crate::QuestionId::new(99), "stray");
        assert!(!has_any_answer(&qs, &state));
    }
}

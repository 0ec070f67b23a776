use std::collections::BTreeMap;

use crate::{AnswerValue, Question, QuestionId, Submission, SubmittedAnswer};

/// The in-progress answers of one respondent session.
///
/// Keyed by question id and independent of the schema: binding a value for
/// an id the form does not know is allowed, it is simply never read.
/// Mutation is last-write-wins with no history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerState {
    values: BTreeMap<QuestionId, AnswerValue>,
}

impl AnswerState {
    /// Create an empty answer state.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Bind a value to a question, replacing whatever was there.
    pub fn set_answer(&mut self, id: QuestionId, value: impl Into<AnswerValue>) {
        self.values.insert(id, value.into());
    }

    /// Get the raw bound value, if any.
    pub fn get_answer(&self, id: QuestionId) -> Option<&AnswerValue> {
        self.values.get(&id)
    }

    /// The value `question` currently reads as.
    ///
    /// Interpreted through the question's type; the type's empty value when
    /// nothing is bound.
    pub fn answer_for(&self, question: &Question) -> AnswerValue {
        match self.values.get(&question.id()) {
            Some(value) => question.answer_type().interpret(value),
            None => question.empty_answer(),
        }
    }

    /// Whether `question` has a non-empty answer.
    pub fn is_answered(&self, question: &Question) -> bool {
        self.values
            .get(&question.id())
            .is_some_and(|value| question.answer_type().is_answered(value))
    }

    /// Toggle one option of a multi-choice answer.
    ///
    /// The current value is decoded into a selection, the option is added or
    /// removed, and the result is stored in toggle order. Returns whether the
    /// option is selected afterwards.
    pub fn toggle_choice(&mut self, question: &Question, label: &str) -> bool {
        let mut selection = self.answer_for(question).to_selection();
        let selected = selection.toggle(label);
        self.values
            .insert(question.id(), AnswerValue::Selection(selection));
        selected
    }

    /// Remove a binding.
    pub fn remove(&mut self, id: QuestionId) -> Option<AnswerValue> {
        self.values.remove(&id)
    }

    pub fn contains(&self, id: QuestionId) -> bool {
        self.values.contains_key(&id)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &AnswerValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The answer list handed to the collaborator: one entry per bound
    /// question, ordered by id.
    ///
    /// Values are encoded through the type of the matching question in
    /// `questions`; bindings without one are encoded as they are.
    pub fn to_submission(&self, questions: &[Question]) -> Submission {
        Submission {
            answers: self
                .values
                .iter()
                .map(|(id, value)| {
                    let encoded = match questions.iter().find(|q| q.id() == *id) {
                        Some(question) => question.answer_type().encode(value),
                        None => value.encode(),
                    };
                    SubmittedAnswer {
                        question_id: *id,
                        value: Some(encoded),
                    }
                })
                .collect(),
        }
    }

    /// Rebuild a state from a submitted answer list. Omitted values bind as
    /// empty text.
    pub fn from_submission(submission: &Submission) -> Self {
        let mut state = Self::new();
        for answer in &submission.answers {
            state.set_answer(
                answer.question_id,
                answer.value.clone().unwrap_or_default(),
            );
        }
        state
    }
}

impl IntoIterator for AnswerState {
    type Item = (QuestionId, AnswerValue);
    type IntoIter = std::collections::btree_map::IntoIter<QuestionId, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a AnswerState {
    type Item = (&'a QuestionId, &'a AnswerValue);
    type IntoIter = std::collections::btree_map::Iter<'a, QuestionId, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnswerType, Selection};

    fn color() -> Question {
        Question::new(2, "Color", AnswerType::MultiChoice, false, ["Red", "Blue", "Green"]).unwrap()
    }

    #[test]
    fn set_answer_is_last_write_wins() {
        let mut state = AnswerState::new();
        let id = QuestionId::new(1);
        state.set_answer(id, "first");
        state.set_answer(id, "second");
        assert_eq!(state.get_answer(id), Some(&AnswerValue::from("second")));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn unbound_questions_read_as_empty_value() {
        let state = AnswerState::new();
        let name = Question::plain(1, "Name", AnswerType::ShortText, true).unwrap();
        assert_eq!(state.answer_for(&name), AnswerValue::from(""));
        assert_eq!(state.answer_for(&color()), AnswerValue::Selection(Selection::new()));
        assert!(!state.is_answered(&name));
    }

    #[test]
    fn toggling_twice_restores_the_set() {
        let q = color();
        let mut state = AnswerState::new();
        assert!(state.toggle_choice(&q, "Red"));
        assert!(state.toggle_choice(&q, "Green"));
        assert_eq!(state.answer_for(&q).encode(), "Red,Green");
        assert!(!state.toggle_choice(&q, "Red"));
        assert_eq!(state.answer_for(&q).encode(), "Green");
        assert!(!state.toggle_choice(&q, "Green"));
        assert!(!state.is_answered(&q));
    }

    #[test]
    fn toggling_decodes_a_text_binding() {
        let q = color();
        let mut state = AnswerState::new();
        state.set_answer(q.id(), "Red, Blue");
        state.toggle_choice(&q, "Red");
        assert_eq!(
            state.answer_for(&q),
            AnswerValue::Selection(Selection::from_labels(["Blue"]))
        );
    }

    #[test]
    fn submission_is_ordered_by_id() {
        let mut state = AnswerState::new();
        state.set_answer(QuestionId::new(5), "five");
        state.set_answer(QuestionId::new(1), "one");
        let submission = state.to_submission(&[]);
        let ids: Vec<i64> = submission.answers.iter().map(|a| a.question_id.get()).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn submission_escapes_choice_labels() {
        let seasoning =
            Question::new(1, "Seasoning", AnswerType::SingleChoice, false, ["Salt, pepper", "None"])
                .unwrap();
        let note = Question::plain(3, "Note", AnswerType::ShortText, false).unwrap();
        let mut state = AnswerState::new();
        state.set_answer(seasoning.id(), "Salt, pepper");
        state.toggle_choice(&color(), "Red");
        state.set_answer(note.id(), "hot, please");

        let submission = state.to_submission(&[seasoning, color(), note]);
        let values: Vec<&str> = submission
            .answers
            .iter()
            .filter_map(|a| a.value.as_deref())
            .collect();
        assert_eq!(values, vec![r"Salt\, pepper", "Red", "hot, please"]);
    }

    #[test]
    fn from_submission_accepts_missing_values() {
        let submission = Submission {
            answers: vec![
                SubmittedAnswer { question_id: QuestionId::new(1), value: None },
                SubmittedAnswer { question_id: QuestionId::new(2), value: Some(String::new()) },
                SubmittedAnswer { question_id: QuestionId::new(3), value: Some("Red,Blue".into()) },
            ],
        };
        let state = AnswerState::from_submission(&submission);
        assert_eq!(state.get_answer(QuestionId::new(1)), Some(&AnswerValue::from("")));
        assert_eq!(state.get_answer(QuestionId::new(2)), Some(&AnswerValue::from("")));

        let q = Question::new(3, "Color", AnswerType::MultiChoice, false, ["Red", "Blue"]).unwrap();
        assert_eq!(
            state.answer_for(&q),
            AnswerValue::Selection(Selection::from_labels(["Blue", "Red"]))
        );
    }
}

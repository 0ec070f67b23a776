use formulary::{
    AnswerState, AnswerType, FormDetail, Question, QuestionId, Respondent, Response, SchemaError,
};

/// How many of [`historical_responses`] survive the report filter against
/// [`event_registration`].
pub const RETAINED_HISTORICAL_RESPONSES: usize = 3;

/// A form using every answer type once.
///
/// | id | question | type | required |
/// |---|---|---|---|
/// | 1 | Full Name | short answer | yes |
/// | 2 | Date of Birth | date | no |
/// | 3 | Ticket Type | multiple choice | yes |
/// | 4 | T-Shirt Size | dropdown | no |
/// | 5 | Interests | checkboxes | yes |
/// | 6 | Anything else? | paragraph | no |
///
/// # Panics
///
/// Never in practice; the schema below is fixed and valid.
pub fn event_registration() -> FormDetail {
    let questions = questions().expect("event registration schema is valid");
    let mut form = FormDetail::new(1, "Event Registration", "event-registration")
        .with_description("Sign up for the autumn meetup.")
        .with_questions(questions);
    form.creator_id = 1;
    form
}

fn questions() -> Result<Vec<Question>, SchemaError> {
    Ok(vec![
        Question::plain(1, "Full Name", AnswerType::ShortText, true)?,
        Question::plain(2, "Date of Birth", AnswerType::Date, false)?,
        Question::new(
            3,
            "Ticket Type",
            AnswerType::SingleChoice,
            true,
            ["Standard", "VIP", "Student"],
        )?,
        Question::new(4, "T-Shirt Size", AnswerType::Dropdown, false, ["S", "M", "L", "XL"])?,
        Question::new(
            5,
            "Interests",
            AnswerType::MultiChoice,
            true,
            ["Talks", "Workshops", "Networking"],
        )?,
        Question::plain(6, "Anything else?", AnswerType::LongText, false)?,
    ])
}

/// Answers that satisfy every required question of [`event_registration`].
pub fn sample_answers(form: &FormDetail) -> AnswerState {
    let mut answers = AnswerState::new();
    answers.set_answer(QuestionId::new(1), "Ada Lovelace");
    answers.set_answer(QuestionId::new(3), "VIP");
    if let Some(interests) = form.question(QuestionId::new(5)) {
        answers.toggle_choice(interests, "Talks");
    }
    answers
}

/// Stored responses as a long-running form accumulates them: keys for
/// questions that no longer exist, literal `"null"` strings, and both
/// escaped and legacy comma-joined multi-choice values.
pub fn historical_responses() -> Vec<Response> {
    let user = |id, name: &str| Respondent::new(id, name, format!("user{id}@webtech.id"));
    vec![
        Response::new("2025-09-01T08:15:00Z", user(2, "Ada Lovelace"))
            .with_answer("Full Name", "Ada Lovelace")
            .with_answer("Ticket Type", "VIP")
            .with_answer("Interests", "Workshops,Networking"),
        Response::new("2025-09-01 09:00:00", user(3, "Only Orphans"))
            .with_answer("Company", "ACME")
            .with_answer("Dietary needs", "None"),
        Response::new("2025-09-02 10:30:00", user(4, "Null Person"))
            .with_answer("Full Name", "null")
            .with_answer("Interests", "")
            .with_answer("Anything else?", "   "),
        Response::new("2025-09-03 11:45:00", user(5, "Grace Hopper"))
            .with_answer("Full Name", "Grace Hopper")
            .with_answer("Ticket Type", "Student")
            .with_answer("Interests", "Talks, Workshops"),
        Response::new("not a date", user(6, "Late Entry"))
            .with_answer("Date of Birth", "1990-01-01")
            .with_answer("Anything else?", "NULL"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use formulary::{Report, ReportOptions, validation};

    #[test]
    fn every_answer_type_is_used() {
        let form = event_registration();
        for answer_type in AnswerType::ALL {
            assert!(
                form.questions.iter().any(|q| q.answer_type() == answer_type),
                "{answer_type} missing"
            );
        }
    }

    #[test]
    fn sample_answers_can_be_submitted() {
        let form = event_registration();
        let answers = sample_answers(&form);
        assert!(validation::status(&form.questions, &answers).can_submit());
    }

    #[test]
    fn retained_count_matches() {
        let form = event_registration();
        let responses = historical_responses();
        let report = Report::build(&form.questions, &responses, &ReportOptions::default());
        assert_eq!(report.total(), RETAINED_HISTORICAL_RESPONSES);
        assert_eq!(report.rows[2].date, "not a date");
    }
}

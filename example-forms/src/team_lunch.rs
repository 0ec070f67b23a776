use formulary::{AnswerType, FormInput, QuestionInput};

/// A form as an operator would author it: metadata first, then questions
/// one at a time. Choices are typed as a comma-separated list.
pub fn team_lunch() -> (FormInput, Vec<QuestionInput>) {
    let form = FormInput::from_name("Team Lunch")
        .with_description("Friday lunch order. One response per person.")
        .with_allowed_domain("webtech.id")
        .limited_to_one_response(true);

    let questions = vec![
        QuestionInput::new("Name", AnswerType::ShortText).with_required(true),
        QuestionInput::new("Main", AnswerType::Dropdown)
            .with_choice_list("Soup, Salad, Pasta")
            .with_required(true),
        QuestionInput::new("Extras", AnswerType::MultiChoice)
            .with_choices(["Bread", "Dessert", "Salt, pepper"]),
        QuestionInput::new("Notes", AnswerType::LongText),
    ];

    (form, questions)
}

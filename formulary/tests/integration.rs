//! Integration tests for formulary

use std::sync::Arc;

use formulary::{
    AnswerType, Cell, CatalogQuery, FieldEvent, FormDetail, FormEditor, FormInput, MemoryStore,
    Question, QuestionId, QuestionInput, ReportOptions, Respondent, RespondentSession, Response,
    SessionError, SubmitError, SubmitOutcome, browse,
};

fn owner() -> Respondent {
    Respondent::new(1, "Owner", "owner@webtech.id")
}

#[tokio::test]
async fn test_author_respond_report_cycle() {
    let store = Arc::new(MemoryStore::new(owner()));

    let mut editor = FormEditor::create(
        Arc::clone(&store),
        FormInput::from_name("Team Lunch").with_allowed_domain("webtech.id"),
    )
    .await
    .unwrap();
    let name = editor
        .add_question(QuestionInput::new("Name", AnswerType::ShortText).with_required(true))
        .await
        .unwrap();
    let extras = editor
        .add_question(
            QuestionInput::new("Extras", AnswerType::MultiChoice)
                .with_choices(["Milk", "Sugar", "Lemon, sliced"]),
        )
        .await
        .unwrap();
    let bread = editor
        .add_question(
            QuestionInput::new("Bread", AnswerType::Dropdown)
                .with_choices(["Rye", "Sourdough, toasted"]),
        )
        .await
        .unwrap();

    store.set_respondent(Respondent::new(2, "Ada", "ada@webtech.id"));
    let mut session = RespondentSession::open(Arc::clone(&store), "team-lunch")
        .await
        .unwrap();
    session
        .apply(name.id(), FieldEvent::Edit("Ada".into()))
        .unwrap();
    session
        .apply(extras.id(), FieldEvent::Toggle("Lemon, sliced".into()))
        .unwrap();
    session
        .apply(extras.id(), FieldEvent::Toggle("Milk".into()))
        .unwrap();
    session
        .apply(bread.id(), FieldEvent::Select("Sourdough, toasted".into()))
        .unwrap();
    assert_eq!(session.submit().await.unwrap(), SubmitOutcome::Submitted);

    store.set_respondent(owner());
    let report = editor.report(&ReportOptions::default()).await.unwrap();
    assert_eq!(report.total(), 1);
    assert_eq!(
        report.rows[0].cells,
        vec![
            Cell::Text("Ada".into()),
            Cell::List(vec!["Lemon, sliced".into(), "Milk".into()]),
            Cell::Text("Sourdough, toasted".into()),
        ]
    );
}

#[tokio::test]
async fn test_outside_domain_is_forbidden() {
    let store = Arc::new(MemoryStore::new(owner()));
    FormEditor::create(
        Arc::clone(&store),
        FormInput::new("Internal", "internal").with_allowed_domain("webtech.id"),
    )
    .await
    .unwrap();

    store.set_respondent(Respondent::new(5, "Eve", "eve@example.com"));
    let error = RespondentSession::open(Arc::clone(&store), "internal")
        .await
        .err()
        .unwrap();
    assert!(matches!(error, SessionError::Forbidden));
}

#[tokio::test]
async fn test_second_response_is_refused() {
    let form = FormDetail::new(1, "Vote", "vote")
        .limited_to_one_response(true)
        .with_questions(vec![
            Question::new(1, "Pick", AnswerType::SingleChoice, true, ["A", "B"]).unwrap(),
        ]);
    let store = Arc::new(MemoryStore::new(Respondent::new(3, "Bo", "bo@x.io")).with_form(form));

    for attempt in 0..2 {
        let mut session = RespondentSession::open(Arc::clone(&store), "vote").await.unwrap();
        session
            .apply(QuestionId::new(1), FieldEvent::Select("B".into()))
            .unwrap();
        let result = session.submit().await;
        if attempt == 0 {
            assert_eq!(result.unwrap(), SubmitOutcome::Submitted);
        } else {
            let error = result.unwrap_err();
            assert!(matches!(error, SubmitError::AlreadySubmitted));
            assert!(error.is_terminal());
            assert_eq!(error.to_string(), "You already submitted this form.");
            assert!(!session.can_submit());
            assert!(matches!(session.submit().await, Err(SubmitError::Closed)));
        }
    }
    assert_eq!(store.response_count("vote"), 1);
}

#[tokio::test]
async fn test_report_survives_schema_changes() {
    let mut form = FormDetail::new(1, "Feedback", "feedback").with_questions(vec![
        Question::plain(1, "Name", AnswerType::ShortText, false).unwrap(),
        Question::plain(2, "Old question", AnswerType::LongText, false).unwrap(),
    ]);
    form.creator_id = 1;

    let legacy = |name: &str, answers: &[(&str, &str)]| {
        answers.iter().fold(
            Response::new("2024-11-02T09:30:00Z", Respondent::new(9, name, "r@x.io")),
            |r, (k, v)| r.with_answer(*k, *v),
        )
    };
    let store = Arc::new(
        MemoryStore::new(owner())
            .with_form(form)
            .with_responses(
                "feedback",
                vec![
                    legacy("Only old", &[("Old question", "kept")]),
                    legacy("Nulls", &[("Name", "null"), ("Old question", "x")]),
                    legacy("Kept", &[("Name", "Kim")]),
                ],
            ),
    );

    let mut editor = FormEditor::open(Arc::clone(&store), "feedback").await.unwrap();
    assert_eq!(editor.report(&ReportOptions::default()).await.unwrap().total(), 3);

    editor.remove_question(QuestionId::new(2)).await.unwrap();
    editor
        .add_question(QuestionInput::new("Rating", AnswerType::Dropdown).with_choice_list("1,2,3"))
        .await
        .unwrap();

    let report = editor.report(&ReportOptions::default()).await.unwrap();
    assert_eq!(report.total(), 1);
    assert_eq!(report.columns, vec!["Date", "Name", "Email", "Name", "Rating"]);
    assert_eq!(report.rows[0].name, "Kept");
    assert_eq!(report.rows[0].date, "2024-11-02 09:30:00");
    assert!(report.rows[0].cells[1].is_placeholder());
}

#[tokio::test]
async fn test_catalog_over_store_listing() {
    let store = Arc::new(MemoryStore::new(owner()));
    for name in ["Zeta poll", "alpha survey", "Beta feedback"] {
        FormEditor::create(Arc::clone(&store), FormInput::from_name(name))
            .await
            .unwrap();
    }
    let forms = formulary::FormStore::list_forms(&*store).await.unwrap();

    let page = browse(&forms, &CatalogQuery::default());
    let names: Vec<&str> = page.forms.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["alpha survey", "Beta feedback", "Zeta poll"]);

    let found = browse(&forms, &CatalogQuery::default().with_search("POLL"));
    assert_eq!(found.forms.len(), 1);
    assert_eq!(found.forms[0].slug, "zeta-poll");
}

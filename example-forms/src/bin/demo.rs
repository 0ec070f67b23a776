//! Author a form, collect a few responses and print the report.
//!
//! Run with `RUST_LOG=debug` to see every answer change.

use std::sync::Arc;

use anyhow::{Context, Result};
use formulary::{
    ConfigLoader, FieldEvent, FormEditor, FormStore, MemoryStore, Respondent, RespondentSession,
    SessionError, browse,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = ConfigLoader::load(None).context("loading configuration")?;

    let owner = Respondent::new(1, "Operator", "ops@webtech.id");
    let store = Arc::new(MemoryStore::new(owner.clone()));

    // Authoring
    let (form_input, question_inputs) = example_forms::team_lunch();
    let mut editor = FormEditor::create(Arc::clone(&store), form_input).await?;
    for input in question_inputs {
        editor.add_question(input).await?;
    }
    info!(path = %editor.share_path(), "Form published");

    println!("Preview of '{}':", editor.form().name);
    for field in editor.preview() {
        let options: Vec<&str> = field
            .affordance
            .options()
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        println!(
            "  {}. {}{} [{}] {}",
            field.position,
            field.name,
            if field.required { " *" } else { "" },
            field.answer_type,
            options.join(" | ")
        );
    }

    let slug = editor.form().slug.clone();
    let ids: Vec<_> = editor.questions().iter().map(|q| q.id()).collect();
    let &[name, main, extras, notes] = ids.as_slice() else {
        anyhow::bail!("unexpected question count: {}", ids.len());
    };

    // Respondents
    let answers: [(Respondent, &str, &str, &[&str]); 2] = [
        (Respondent::new(2, "Ada", "ada@webtech.id"), "Ada", "Pasta", &["Salt, pepper", "Dessert"]),
        (Respondent::new(3, "Bob", "bob@webtech.id"), "Bob", "Soup", &[]),
    ];
    for (respondent, full_name, dish, picks) in answers {
        store.set_respondent(respondent);
        let mut session = RespondentSession::open(Arc::clone(&store), &slug).await?;
        session.apply(name, FieldEvent::Edit(full_name.to_string()))?;
        println!("{full_name}: can submit after name? {}", session.can_submit());
        session.apply(main, FieldEvent::Select(dish.to_string()))?;
        for pick in picks {
            session.apply(extras, FieldEvent::Toggle(pick.to_string()))?;
        }
        let outcome = session.submit().await?;
        println!("{full_name}: {outcome:?}");
    }

    // Ada tries again on a one-response form.
    store.set_respondent(Respondent::new(2, "Ada", "ada@webtech.id"));
    let mut again = RespondentSession::open(Arc::clone(&store), &slug).await?;
    again.apply(name, FieldEvent::Edit("Ada".to_string()))?;
    again.apply(main, FieldEvent::Select("Salad".to_string()))?;
    if let Err(e) = again.submit().await {
        warn!(terminal = e.is_terminal(), "{e}");
    }

    // Someone outside the allowed domain.
    store.set_respondent(Respondent::new(4, "Eve", "eve@example.com"));
    match RespondentSession::open(Arc::clone(&store), &slug).await {
        Err(SessionError::Forbidden) => println!("Eve: forbidden"),
        Err(e) => return Err(e.into()),
        Ok(_) => println!("Eve: unexpectedly allowed in"),
    }

    // Back to the operator: drop a question and read the report.
    store.set_respondent(owner);
    editor.remove_question(notes).await?;
    let report = editor.report(&config.report_options()).await?;

    println!("\nTotal Responses: {}", report.total());
    println!("{}", report.columns.join(" | "));
    for row in report.text_rows() {
        println!("{}", row.join(" | "));
    }

    let forms = store.list_forms().await?;
    let page = browse(&forms, &config.catalog_query().with_search("lunch"));
    println!(
        "\nCatalog: {} match(es), page {} of {}",
        page.forms.len(),
        page.page,
        page.total_pages
    );

    Ok(())
}

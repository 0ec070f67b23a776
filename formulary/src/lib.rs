//! # formulary
//!
//! Dynamic questionnaires. Backend-agnostic.
//!
//! An operator defines a form (an ordered list of typed questions),
//! respondents fill it in through a [`RespondentSession`], and the operator
//! reviews the stored responses as a [`Report`]. Persistence, transport and
//! authentication live behind the [`FormStore`] trait.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formulary::{
//!     AnswerType, FieldEvent, FormEditor, FormInput, QuestionInput, RespondentSession,
//! };
//!
//! let mut editor = FormEditor::create(store.clone(), FormInput::from_name("Team Lunch")).await?;
//! let dish = editor
//!     .add_question(
//!         QuestionInput::new("Dish", AnswerType::Dropdown).with_choice_list("Soup, Salad"),
//!     )
//!     .await?;
//!
//! let mut session = RespondentSession::open(store.clone(), "team-lunch").await?;
//! session.apply(dish.id(), FieldEvent::Select("Soup".into()))?;
//! session.submit().await?;
//!
//! let report = editor.report(&Default::default()).await?;
//! ```
//!
//! ## Answer types
//!
//! | type | input | value |
//! |---|---|---|
//! | short answer | text input | text |
//! | paragraph | text area | text |
//! | date | date input | text |
//! | multiple choice | radio group | one choice |
//! | dropdown | select box | one choice |
//! | checkboxes | checkbox group | set of choices |
//!
//! ## Stores
//!
//! [`MemoryStore`] keeps everything in memory and applies the usual access
//! rules (allowed e-mail domains, one response per user). It is meant for
//! tests and demos; real deployments implement [`FormStore`] over their own
//! backend.

// Re-export all types from formulary-types
pub use formulary_types::*;

mod store;
pub use store::{FormStore, StoreError};

mod memory_store;
pub use memory_store::MemoryStore;

mod session;
pub use session::{RespondentSession, SessionError, SessionHandle, SubmitError, SubmitOutcome};

mod editor;
pub use editor::{EditorError, FormEditor};

mod config;
pub use config::{CatalogConfig, ConfigLoader, FormularyConfig, ReportConfig};

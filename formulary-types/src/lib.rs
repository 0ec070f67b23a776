//! Core types for the formulary crate.
//!
//! This crate is the presentation-agnostic questionnaire engine:
//! - `AnswerType` and `Question` - The closed question-type registry and schema
//! - `AnswerValue`, `Selection` and `AnswerState` - Per-session answers
//! - `validation` - The predicates gating submission
//! - `FormView` and `FieldView` - The rendering contract shared by capture and preview
//! - `Report` - The transform from stored responses to a table
//! - `browse` - Searching, sorting and paging the form list

mod ids;
pub use ids::{QuestionId, QuestionName};

mod answer_value;
pub use answer_value::{
    AnswerValue, DELIMITER, ESCAPE, Selection, contains_delimiter, decode_label, split_encoded,
};

mod question;
pub use question::{AffordanceKind, AnswerType, Cardinality, Question, QuestionInput};

mod form;
pub use form::{Form, FormDetail, FormInput, Respondent};

mod answer_state;
pub use answer_state::AnswerState;

mod response;
pub use response::{Response, Submission, SubmittedAnswer};

pub mod validation;
pub use validation::{FormStatus, ValidationError};

mod render;
pub use render::{
    Affordance, ChoiceOption, FieldEvent, FieldView, FormView, InputError, Mode, apply_event,
    field_view,
};

pub mod report;
pub use report::{Cell, Report, ReportOptions, ReportRow};

mod slug;
pub use slug::{is_valid_slug, suggest_slug};

mod catalog;
pub use catalog::{
    CatalogPage, CatalogQuery, DEFAULT_PER_PAGE, DEFAULT_VISIBLE_PAGES, SortKey, SortOrder, browse,
};

mod error;
pub use error::{FormInputError, SchemaError};

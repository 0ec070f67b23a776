use crate::AnswerType;

/// A malformed question definition, caught at authoring time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Question name is required")]
    EmptyName,

    #[error("Choices required for '{0}' questions")]
    MissingChoices(AnswerType),

    #[error("'{0}' questions do not take choices")]
    UnexpectedChoices(AnswerType),

    #[error("Duplicate choice '{0}'")]
    DuplicateChoice(String),

    #[error("Unknown question type '{0}'")]
    UnknownAnswerType(String),
}

/// Malformed form metadata, caught at authoring time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormInputError {
    #[error("Form name is required")]
    MissingName,

    #[error("Slug is required")]
    MissingSlug,

    #[error("Slug must be lowercase and URL-friendly: '{0}'")]
    InvalidSlug(String),
}

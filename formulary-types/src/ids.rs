use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a question within a form.
///
/// Everything that happens while a respondent is filling in a form (answer
/// state, input events, the submitted answer list) is keyed by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(i64);

impl QuestionId {
    /// Wrap a raw id as assigned by the collaborator.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw id.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for QuestionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Display label of a question, e.g. `"Favourite colour"`.
///
/// Stored responses are keyed by the name a question had at submission
/// time, not by its id. Renaming a question therefore orphans the answers
/// recorded under its old name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionName(String);

impl QuestionName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for QuestionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for QuestionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QuestionName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for QuestionName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&String> for QuestionName {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

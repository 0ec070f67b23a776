use std::collections::BTreeMap;

use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::{QuestionId, Respondent};

/// A stored response, as read back from the collaborator.
///
/// Answers are keyed by the question *name* at submission time. They may
/// mention questions that have since been removed or renamed, and lack
/// questions added later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Submission timestamp as stored; kept raw so odd formats still load.
    pub date: String,

    pub user: Respondent,

    #[serde(default, deserialize_with = "lenient_answers")]
    pub answers: BTreeMap<String, String>,
}

impl Response {
    pub fn new(date: impl Into<String>, user: Respondent) -> Self {
        Self {
            date: date.into(),
            user,
            answers: BTreeMap::new(),
        }
    }

    pub fn with_answer(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.answers.insert(key.into(), value.into());
        self
    }

    /// The stored value under a question name.
    pub fn answer(&self, key: &str) -> Option<&str> {
        self.answers.get(key).map(String::as_str)
    }
}

/// The answer list sent to the collaborator on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub answers: Vec<SubmittedAnswer>,
}

/// One `{question_id, value}` pair of a submission.
///
/// An omitted value and an empty string mean the same thing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: QuestionId,

    #[serde(default)]
    pub value: Option<String>,
}

impl SubmittedAnswer {
    /// The value, with omission read as empty.
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Text(String),
    Other(IgnoredAny),
}

/// Keep string answers and silently drop anything else (nulls, numbers,
/// nested objects). Historical data cannot be trusted to be well-formed.
fn lenient_answers<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, StoredValue>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| match value {
            StoredValue::Text(text) => Some((key, text)),
            StoredValue::Other(_) => None,
        })
        .collect())
}

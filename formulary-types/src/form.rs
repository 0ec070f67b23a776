use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{FormInputError, Question, QuestionId, QuestionName, is_valid_slug, report};

/// Form metadata as returned by the form listing (no questions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub limit_one_response: bool,
}

/// A form with its access metadata and ordered questions.
///
/// The engine only ever reads this; the question list is owned by the
/// authoring workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDetail {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub limit_one_response: bool,
    #[serde(default)]
    pub creator_id: i64,
    #[serde(default)]
    pub allowed_domains: BTreeSet<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl FormDetail {
    /// Create an empty form with the given identity.
    pub fn new(id: i64, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            slug: slug.into(),
            description: String::new(),
            limit_one_response: false,
            creator_id: 0,
            allowed_domains: BTreeSet::new(),
            questions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    /// Restrict respondents to an e-mail domain, stored trimmed and
    /// lowercased. Blank domains are ignored.
    pub fn with_allowed_domain(mut self, domain: impl Into<String>) -> Self {
        let domain = domain.into().trim().to_lowercase();
        if !domain.is_empty() {
            self.allowed_domains.insert(domain);
        }
        self
    }

    pub fn limited_to_one_response(mut self, limit: bool) -> Self {
        self.limit_one_response = limit;
        self
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Look up a question by id.
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// The names of the current questions, in form order.
    pub fn question_names(&self) -> Vec<QuestionName> {
        report::question_keys(&self.questions)
    }

    /// The listing view of this form.
    pub fn summary(&self) -> Form {
        Form {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            limit_one_response: self.limit_one_response,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }
}

/// Authoring payload for a new form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    #[serde(default)]
    pub limit_one_response: bool,
}

impl FormInput {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            ..Default::default()
        }
    }

    /// Start from a name and use its suggested slug.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = crate::suggest_slug(&name);
        Self::new(name, slug)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_allowed_domain(mut self, domain: impl Into<String>) -> Self {
        self.allowed_domains.push(domain.into());
        self
    }

    pub fn limited_to_one_response(mut self, limit: bool) -> Self {
        self.limit_one_response = limit;
        self
    }

    /// Check the name and slug.
    pub fn validate(&self) -> Result<(), FormInputError> {
        if self.name.trim().is_empty() {
            return Err(FormInputError::MissingName);
        }
        if self.slug.is_empty() {
            return Err(FormInputError::MissingSlug);
        }
        if !is_valid_slug(&self.slug) {
            return Err(FormInputError::InvalidSlug(self.slug.clone()));
        }
        Ok(())
    }

    /// The allowed domains, trimmed, lowercased and without blanks.
    pub fn normalized_domains(&self) -> BTreeSet<String> {
        self.allowed_domains
            .iter()
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect()
    }
}

/// The user a stored response was submitted by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Respondent {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl Respondent {
    pub fn new(id: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    /// The part of the e-mail address after the last `@`, lowercased.
    pub fn email_domain(&self) -> Option<String> {
        self.email
            .rsplit_once('@')
            .map(|(_, domain)| domain.trim().to_lowercase())
            .filter(|domain| !domain.is_empty())
    }
}

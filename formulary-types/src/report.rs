//! The reporting transform: filter stored responses down to the ones that
//! say something about the current questions, then lay them out as a table.
//!
//! Responses are joined to questions by *name*. Keys for removed or renamed
//! questions are simply never looked at, and questions added after a
//! response was stored show the placeholder.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDateTime};

use crate::answer_value::{contains_delimiter, decode_label, split_encoded};
use crate::{Question, QuestionName, Response};

/// Shown for a missing, blank or `"null"` answer.
pub const PLACEHOLDER: &str = "—";

/// Default `chrono` format for the date column.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The leading columns of every report.
pub const FIXED_COLUMNS: [&str; 3] = ["Date", "Name", "Email"];

/// The current question names, in question order.
pub fn question_keys(questions: &[Question]) -> Vec<QuestionName> {
    questions.iter().map(|q| q.name().clone()).collect()
}

/// Whether a response has a meaningful answer for at least one key.
///
/// Always false for an empty key set.
pub fn has_signal(response: &Response, keys: &[QuestionName]) -> bool {
    keys.iter()
        .any(|key| response.answer(key.as_str()).is_some_and(is_meaningful))
}

/// Keep the responses with signal, in input order.
///
/// The input is not modified; applying this to its own output returns the
/// same list.
pub fn retain_signal(responses: &[Response], keys: &[QuestionName]) -> Vec<Response> {
    responses
        .iter()
        .filter(|response| has_signal(response, keys))
        .cloned()
        .collect()
}

/// Non-blank and not the literal `"null"` in any casing.
fn is_meaningful(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !value.eq_ignore_ascii_case("null")
}

/// One answer cell of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Placeholder,
    Text(String),
    /// A multi-value answer, one entry per label.
    List(Vec<String>),
}

impl Cell {
    /// Classify a stored value. Both shapes are unescaped, so a single
    /// label containing the delimiter reads back as that label.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some(value) if is_meaningful(value) => {
                if contains_delimiter(value) {
                    Self::List(split_encoded(value))
                } else {
                    Self::Text(decode_label(value))
                }
            }
            _ => Self::Placeholder,
        }
    }

    /// Flatten to text, joining list entries with `", "`.
    pub fn render(&self, placeholder: &str) -> String {
        match self {
            Self::Placeholder => placeholder.to_string(),
            Self::Text(text) => text.clone(),
            Self::List(items) => items.join(", "),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

/// Report layout options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub placeholder: String,
    pub date_format: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            placeholder: PLACEHOLDER.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// One retained response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub date: String,
    pub name: String,
    pub email: String,
    /// One cell per question, in question order.
    pub cells: Vec<Cell>,
}

/// The response table for a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub columns: Vec<String>,
    pub rows: Vec<ReportRow>,
    pub placeholder: String,
}

impl Report {
    /// Build the table from the current questions and every stored
    /// response. Responses without signal are dropped.
    pub fn build(questions: &[Question], responses: &[Response], options: &ReportOptions) -> Self {
        let keys = question_keys(questions);

        let columns = FIXED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(keys.iter().map(|k| k.to_string()))
            .collect();

        let rows = responses
            .iter()
            .filter(|response| has_signal(response, &keys))
            .map(|response| ReportRow {
                date: format_date(&response.date, &options.date_format),
                name: response.user.name.clone(),
                email: response.user.email.clone(),
                cells: keys
                    .iter()
                    .map(|key| Cell::from_stored(response.answer(key.as_str())))
                    .collect(),
            })
            .collect();

        Self {
            columns,
            rows,
            placeholder: options.placeholder.clone(),
        }
    }

    /// The number of retained responses.
    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The number of answer columns (question count).
    pub fn question_count(&self) -> usize {
        self.columns.len() - FIXED_COLUMNS.len()
    }

    /// Every row flattened to text, fixed columns first.
    pub fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                [row.date.clone(), row.name.clone(), row.email.clone()]
                    .into_iter()
                    .chain(row.cells.iter().map(|cell| cell.render(&self.placeholder)))
                    .collect()
            })
            .collect()
    }
}

/// Reformat a stored timestamp, or return it unchanged if it doesn't parse
/// (or the format string is bad).
pub fn format_date(raw: &str, format: &str) -> String {
    let trimmed = raw.trim();
    let mut out = String::new();
    let written = if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
        write!(out, "{}", date.format(format))
    } else if let Ok(date) = NaiveDateTime::parse_from_str(trimmed, DEFAULT_DATE_FORMAT) {
        write!(out, "{}", date.format(format))
    } else {
        return raw.to_string();
    };
    match written {
        Ok(()) => out,
        Err(_) => raw.to_string(),
    }
}

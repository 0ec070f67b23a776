use std::fmt;

/// Separator between option labels in an encoded multi-choice answer.
pub const DELIMITER: char = ',';

/// Escapes a literal [`DELIMITER`] (or itself) inside an option label.
pub const ESCAPE: char = '\\';

/// A set of selected option labels from a multi-choice question.
///
/// Labels are kept in the order they were toggled on, but equality is set
/// equality: `{"Red", "Blue"} == {"Blue", "Red"}`. Labels are trimmed on
/// insertion and blank labels are ignored, so a selection never holds
/// duplicates or empty entries.
#[derive(Debug, Clone, Default, Eq)]
pub struct Selection {
    labels: Vec<String>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self { labels: Vec::new() }
    }

    /// Build a selection from labels, dropping blanks and duplicates.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for label in labels {
            selection.insert(label.as_ref());
        }
        selection
    }

    /// Decode a delimiter-joined answer string.
    ///
    /// Plain comma-separated data (without any escapes) decodes the same way
    /// a comma split followed by trimming would.
    pub fn decode(encoded: &str) -> Self {
        Self::from_labels(split_encoded(encoded))
    }

    /// Encode the selection as a delimiter-joined string in toggle order.
    pub fn encode(&self) -> String {
        self.labels
            .iter()
            .map(|label| escape_label(label))
            .collect::<Vec<_>>()
            .join(&DELIMITER.to_string())
    }

    pub fn contains(&self, label: &str) -> bool {
        let label = label.trim();
        self.labels.iter().any(|l| l == label)
    }

    /// Add a label. Returns `false` if it was blank or already selected.
    pub fn insert(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() || self.contains(label) {
            return false;
        }
        self.labels.push(label.to_string());
        true
    }

    /// Remove a label. Returns `false` if it was not selected.
    pub fn remove(&mut self, label: &str) -> bool {
        let label = label.trim();
        let before = self.labels.len();
        self.labels.retain(|l| l != label);
        self.labels.len() != before
    }

    /// Symmetric difference with `{label}`. Returns whether the label is
    /// selected afterwards.
    pub fn toggle(&mut self, label: &str) -> bool {
        if self.remove(label) {
            false
        } else {
            self.insert(label)
        }
    }

    /// Whether every selected label is one of `choices` (compared trimmed).
    pub fn is_subset_of(&self, choices: &[String]) -> bool {
        self.labels
            .iter()
            .all(|label| choices.iter().any(|choice| choice.trim() == label))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|label| other.contains(label))
    }
}

impl<S: AsRef<str>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_labels(iter)
    }
}

/// The value bound to one question in an answer state.
///
/// Scalar question types hold `Text`; multi-choice questions hold a
/// `Selection`. A value bound in the "wrong" shape is reinterpreted through
/// the question type (see [`crate::AnswerType::interpret`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    Text(String),
    Selection(Selection),
}

impl AnswerValue {
    /// Try to get this value as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Selection(_) => None,
        }
    }

    /// Try to get this value as a selection.
    pub fn as_selection(&self) -> Option<&Selection> {
        match self {
            Self::Text(_) => None,
            Self::Selection(selection) => Some(selection),
        }
    }

    /// View this value as a selection, decoding text if necessary.
    pub fn to_selection(&self) -> Selection {
        match self {
            Self::Text(text) => Selection::decode(text),
            Self::Selection(selection) => selection.clone(),
        }
    }

    /// The string form handed to the collaborator.
    pub fn encode(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Selection(selection) => selection.encode(),
        }
    }

    /// Whitespace-only text and empty selections are blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Selection(selection) => selection.is_empty(),
        }
    }

    /// Get the shape name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Selection(_) => "Selection",
        }
    }
}

impl Default for AnswerValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Selection> for AnswerValue {
    fn from(selection: Selection) -> Self {
        Self::Selection(selection)
    }
}

/// Split an encoded answer on unescaped delimiters.
///
/// Each segment is unescaped and trimmed; empty segments are dropped. Only
/// `\,` and `\\` are escape sequences, any other backslash is kept as is.
pub fn split_encoded(encoded: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = encoded.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE if matches!(chars.peek(), Some(&DELIMITER) | Some(&ESCAPE)) => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            DELIMITER => push_segment(&mut segments, &mut current),
            other => current.push(other),
        }
    }
    push_segment(&mut segments, &mut current);

    segments
}

/// Whether an encoded answer holds more than one segment, i.e. contains an
/// unescaped delimiter.
pub fn contains_delimiter(encoded: &str) -> bool {
    let mut chars = encoded.chars();
    while let Some(c) = chars.next() {
        match c {
            ESCAPE => {
                chars.next();
            }
            DELIMITER => return true,
            _ => {}
        }
    }
    false
}

/// Unescape and trim a single encoded label.
pub fn decode_label(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len());
    let mut chars = encoded.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ESCAPE && matches!(chars.peek(), Some(&DELIMITER) | Some(&ESCAPE)) {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out.trim().to_string()
}

fn push_segment(segments: &mut Vec<String>, current: &mut String) {
    let segment = current.trim();
    if !segment.is_empty() {
        segments.push(segment.to_string());
    }
    current.clear();
}

pub(crate) fn escape_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if c == DELIMITER || c == ESCAPE {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

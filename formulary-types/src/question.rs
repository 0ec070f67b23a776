use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::answer_value::{escape_label, split_encoded};
use crate::{AnswerValue, QuestionId, QuestionName, SchemaError, Selection};

/// The closed registry of answer types.
///
/// Validation, rendering, encoding and document generation all dispatch on
/// this enum through the methods below, so a new variant has to be handled
/// everywhere before the workspace compiles again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerType {
    /// Single-line text input.
    #[serde(rename = "short answer", alias = "short_text")]
    ShortText,

    /// Multi-line text input.
    #[serde(rename = "paragraph", alias = "long_text")]
    LongText,

    /// Calendar date, stored as the text the date input produced.
    #[serde(rename = "date")]
    Date,

    /// Pick exactly one of the choices (radio buttons).
    #[serde(rename = "multiple choice", alias = "single_choice")]
    SingleChoice,

    /// Pick exactly one of the choices (select box).
    #[serde(rename = "dropdown")]
    Dropdown,

    /// Pick any subset of the choices (checkboxes).
    #[serde(rename = "checkboxes", alias = "multi_choice")]
    MultiChoice,
}

/// Whether an answer holds one value or a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Scalar,
    Set,
}

/// The kind of input a question is captured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffordanceKind {
    TextInput,
    TextArea,
    DateInput,
    RadioGroup,
    Select,
    CheckboxGroup,
}

impl AnswerType {
    /// Every registered answer type, in authoring-menu order.
    pub const ALL: [AnswerType; 6] = [
        Self::ShortText,
        Self::LongText,
        Self::Date,
        Self::SingleChoice,
        Self::Dropdown,
        Self::MultiChoice,
    ];

    /// The label the collaborator uses for this type.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::ShortText => "short answer",
            Self::LongText => "paragraph",
            Self::Date => "date",
            Self::SingleChoice => "multiple choice",
            Self::Dropdown => "dropdown",
            Self::MultiChoice => "checkboxes",
        }
    }

    pub fn cardinality(self) -> Cardinality {
        match self {
            Self::ShortText | Self::LongText | Self::Date | Self::SingleChoice | Self::Dropdown => {
                Cardinality::Scalar
            }
            Self::MultiChoice => Cardinality::Set,
        }
    }

    /// Whether a question of this type needs a non-empty choice list.
    pub fn requires_choices(self) -> bool {
        match self {
            Self::ShortText | Self::LongText | Self::Date => false,
            Self::SingleChoice | Self::Dropdown | Self::MultiChoice => true,
        }
    }

    pub fn affordance(self) -> AffordanceKind {
        match self {
            Self::ShortText => AffordanceKind::TextInput,
            Self::LongText => AffordanceKind::TextArea,
            Self::Date => AffordanceKind::DateInput,
            Self::SingleChoice => AffordanceKind::RadioGroup,
            Self::Dropdown => AffordanceKind::Select,
            Self::MultiChoice => AffordanceKind::CheckboxGroup,
        }
    }

    /// The value an unanswered question of this type reads as.
    pub fn empty_value(self) -> AnswerValue {
        match self.cardinality() {
            Cardinality::Scalar => AnswerValue::Text(String::new()),
            Cardinality::Set => AnswerValue::Selection(Selection::new()),
        }
    }

    /// Convert a bound value into this type's shape.
    ///
    /// Text bound to a set-valued question is decoded into a selection, and a
    /// selection bound to a scalar question is encoded back into text. Preview
    /// and capture both read values through here.
    pub fn interpret(self, value: &AnswerValue) -> AnswerValue {
        match (self.cardinality(), value) {
            (Cardinality::Scalar, AnswerValue::Text(_)) => value.clone(),
            (Cardinality::Scalar, AnswerValue::Selection(selection)) => {
                AnswerValue::Text(selection.encode())
            }
            (Cardinality::Set, _) => AnswerValue::Selection(value.to_selection()),
        }
    }

    /// The string stored for a value of this type.
    ///
    /// A picked choice label is escaped like a multi-choice label, so a
    /// label containing the delimiter never reads back as a list.
    pub fn encode(self, value: &AnswerValue) -> String {
        match (self, value) {
            (Self::SingleChoice | Self::Dropdown, AnswerValue::Text(label)) => {
                escape_label(label.trim())
            }
            _ => self.interpret(value).encode(),
        }
    }

    /// Type-aware emptiness: whitespace-only text and empty selections count
    /// as unanswered.
    pub fn is_answered(self, value: &AnswerValue) -> bool {
        !self.interpret(value).is_blank()
    }
}

impl fmt::Display for AnswerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for AnswerType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.wire_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SchemaError::UnknownAnswerType(s.to_string()))
    }
}

/// A single question of a form.
///
/// Questions are immutable once built: an edit produces a new instance.
/// The constructor enforces the schema rules, so a `Question` in hand always
/// has a name, and has choices exactly when its type requires them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion", into = "RawQuestion")]
pub struct Question {
    id: QuestionId,
    name: QuestionName,
    answer_type: AnswerType,
    required: bool,
    choices: Vec<String>,
}

impl Question {
    /// Create a question, rejecting malformed definitions.
    pub fn new<I, S>(
        id: impl Into<QuestionId>,
        name: impl Into<String>,
        answer_type: AnswerType,
        required: bool,
        choices: I,
    ) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (name, choices) = check_schema(&name.into(), answer_type, choices)?;
        Ok(Self {
            id: id.into(),
            name: QuestionName::new(name),
            answer_type,
            required,
            choices,
        })
    }

    /// Create a question of a type without choices.
    pub fn plain(
        id: impl Into<QuestionId>,
        name: impl Into<String>,
        answer_type: AnswerType,
        required: bool,
    ) -> Result<Self, SchemaError> {
        Self::new(id, name, answer_type, required, std::iter::empty::<&str>())
    }

    pub fn id(&self) -> QuestionId {
        self.id
    }

    pub fn name(&self) -> &QuestionName {
        &self.name
    }

    pub fn answer_type(&self) -> AnswerType {
        self.answer_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The ordered option labels (empty for non-choice types).
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Whether `label` (trimmed) is one of this question's choices.
    pub fn has_choice(&self, label: &str) -> bool {
        let label = label.trim();
        self.choices.iter().any(|c| c == label)
    }

    /// The value this question reads as when nothing is bound.
    pub fn empty_answer(&self) -> AnswerValue {
        self.answer_type.empty_value()
    }

    /// Return a copy with a different required flag.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Authoring payload for a new question. The collaborator assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionInput {
    pub name: String,

    #[serde(rename = "choice_type")]
    pub answer_type: AnswerType,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,

    #[serde(rename = "is_required", default)]
    pub required: bool,
}

impl QuestionInput {
    pub fn new(name: impl Into<String>, answer_type: AnswerType) -> Self {
        Self {
            name: name.into(),
            answer_type,
            choices: Vec::new(),
            required: false,
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a comma-separated choice list as typed into an authoring field.
    pub fn with_choice_list(mut self, list: &str) -> Self {
        self.choices = split_encoded(list);
        self
    }

    /// Run the schema checks without building a question.
    pub fn validate(&self) -> Result<(), SchemaError> {
        check_schema(&self.name, self.answer_type, &self.choices).map(|_| ())
    }

    /// Turn the input into a question with the given id.
    pub fn into_question(self, id: impl Into<QuestionId>) -> Result<Question, SchemaError> {
        Question::new(id, self.name, self.answer_type, self.required, self.choices)
    }
}

fn check_schema<I, S>(
    name: &str,
    answer_type: AnswerType,
    choices: I,
) -> Result<(String, Vec<String>), SchemaError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(SchemaError::EmptyName);
    }

    let mut cleaned: Vec<String> = Vec::new();
    for choice in choices {
        let choice = choice.as_ref().trim();
        if choice.is_empty() {
            continue;
        }
        if cleaned.iter().any(|c| c == choice) {
            return Err(SchemaError::DuplicateChoice(choice.to_string()));
        }
        cleaned.push(choice.to_string());
    }

    match (answer_type.requires_choices(), cleaned.is_empty()) {
        (true, true) => Err(SchemaError::MissingChoices(answer_type)),
        (false, false) => Err(SchemaError::UnexpectedChoices(answer_type)),
        _ => Ok((name.to_string(), cleaned)),
    }
}

/// The question shape used on the wire.
///
/// Choices arrive either as a list or as one comma-joined string, and the
/// required flag as a boolean or a 0/1 integer.
#[derive(Serialize, Deserialize)]
struct RawQuestion {
    id: QuestionId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    form_id: Option<i64>,

    name: String,

    choice_type: AnswerType,

    #[serde(default)]
    choices: Option<RawChoices>,

    #[serde(default)]
    is_required: RawFlag,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawChoices {
    List(Vec<String>),
    Joined(String),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
}

impl Default for RawFlag {
    fn default() -> Self {
        Self::Bool(false)
    }
}

impl TryFrom<RawQuestion> for Question {
    type Error = SchemaError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        let choices = if raw.choice_type.requires_choices() {
            match raw.choices {
                Some(RawChoices::List(list)) => list,
                Some(RawChoices::Joined(joined)) => split_encoded(&joined),
                None => Vec::new(),
            }
        } else {
            // Non-choice questions sometimes come back with an empty or stale
            // choice string; it carries no meaning for them.
            Vec::new()
        };
        let required = match raw.is_required {
            RawFlag::Bool(flag) => flag,
            RawFlag::Int(n) => n != 0,
        };
        Question::new(raw.id, raw.name, raw.choice_type, required, choices)
    }
}

impl From<Question> for RawQuestion {
    fn from(question: Question) -> Self {
        let choices = if question.choices.is_empty() {
            None
        } else {
            Some(RawChoices::List(question.choices))
        };
        Self {
            id: question.id,
            form_id: None,
            name: question.name.into_string(),
            choice_type: question.answer_type,
            choices,
            is_required: RawFlag::Bool(question.required),
        }
    }
}

//! HTML form generator implementation.

use formulary::{
    Affordance, AnswerState, ChoiceOption, FieldView, FormDetail, FormView, Mode, validation,
};

/// How forms and reports are turned into markup.
///
/// Both [`form_to_html`] and [`crate::report_to_html`] read the same options,
/// so a form page and its response page can share a stylesheet.
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Page heading and `<title>`. A form falls back to its name, a report
    /// to "Responses".
    pub title: Option<String>,
    /// Embed the bundled stylesheet.
    pub include_styles: bool,
    /// Wrap the output in `<html>`, or return the bare `<form>`/`<div>`.
    pub full_document: bool,
    /// Prepended to every generated class name, e.g. `form-field`.
    pub class_prefix: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            title: None,
            include_styles: true,
            full_document: true,
            class_prefix: "form".to_string(),
        }
    }
}

impl HtmlOptions {
    /// A styled, standalone page with `form-` classes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_styles(mut self, include: bool) -> Self {
        self.include_styles = include;
        self
    }

    /// `false` yields a fragment for embedding in an existing page.
    pub fn full_document(mut self, full: bool) -> Self {
        self.full_document = full;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }
}

/// Render a form.
///
/// In [`Mode::Preview`] every input is disabled and there is no submit
/// button. In [`Mode::Capture`] the submit button is disabled until the
/// answers pass validation.
pub fn form_to_html(
    form: &FormDetail,
    answers: Option<&AnswerState>,
    mode: Mode,
    options: &HtmlOptions,
) -> String {
    let prefix = &options.class_prefix;
    let title = options.title.as_deref().unwrap_or(&form.name);
    let fields = FormView::new(&form.questions, mode).fields(answers);

    let mut body = String::new();
    body.push_str(&format!("<form class=\"{prefix}-form\">\n"));
    body.push_str(&format!(
        "  <h1 class=\"{prefix}-title\">{}</h1>\n",
        escape_html(title)
    ));
    if !form.description.is_empty() {
        body.push_str(&format!(
            "  <p class=\"{prefix}-description\">{}</p>\n",
            escape_html(&form.description)
        ));
    }

    body.push_str(&format!("  <div class=\"{prefix}-questions\">\n"));
    for field in &fields {
        let show_invalid = answers.is_some() && !field.valid;
        body.push_str(&generate_field(field, prefix, show_invalid));
    }
    body.push_str("  </div>\n");

    if !mode.is_read_only() {
        let can_submit = answers
            .map(|state| validation::status(&form.questions, state).can_submit())
            .unwrap_or(false);
        let disabled = if can_submit { "" } else { " disabled" };
        body.push_str(&format!(
            "  <button type=\"submit\" class=\"{prefix}-submit\"{disabled}>Submit</button>\n"
        ));
    }
    body.push_str("</form>\n");

    if options.full_document {
        wrap_document(title, &body, options)
    } else {
        body
    }
}

pub(crate) fn wrap_document(title: &str, body: &str, options: &HtmlOptions) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
    if options.include_styles {
        html.push_str(&generate_styles(&options.class_prefix));
    }
    html.push_str("</head>\n<body>\n");
    html.push_str(body);
    html.push_str("</body>\n</html>\n");
    html
}

/// Generate HTML for a single question.
fn generate_field(field: &FieldView, prefix: &str, show_invalid: bool) -> String {
    let ind = "    ";
    let field_id = format!("{prefix}-q{}", field.id);
    let name = format!("q-{}", field.id);
    let disabled = if field.read_only { " disabled" } else { "" };
    let required = if field.required { " required" } else { "" };
    let invalid = if show_invalid { " aria-invalid=\"true\"" } else { "" };
    let label = label_text(field);

    let mut html = String::new();
    let class = if show_invalid {
        format!("{prefix}-field {prefix}-invalid")
    } else {
        format!("{prefix}-field")
    };

    match &field.affordance {
        Affordance::TextInput | Affordance::DateInput => {
            let input_type = if matches!(field.affordance, Affordance::DateInput) {
                "date"
            } else {
                "text"
            };
            let value = field.display_value();
            html.push_str(&format!("{ind}<div class=\"{class}\">\n"));
            html.push_str(&format!(
                "{ind}  <label for=\"{field_id}\">{label}</label>\n"
            ));
            html.push_str(&format!(
                "{ind}  <input type=\"{input_type}\" id=\"{field_id}\" name=\"{name}\" class=\"{prefix}-input\" value=\"{}\"{required}{disabled}{invalid}>\n",
                escape_html(&value)
            ));
            html.push_str(&format!("{ind}</div>\n"));
        }

        Affordance::TextArea => {
            let content = escape_html(&field.display_value());
            html.push_str(&format!("{ind}<div class=\"{class}\">\n"));
            html.push_str(&format!(
                "{ind}  <label for=\"{field_id}\">{label}</label>\n"
            ));
            html.push_str(&format!(
                "{ind}  <textarea id=\"{field_id}\" name=\"{name}\" rows=\"4\" class=\"{prefix}-textarea\"{required}{disabled}{invalid}>{content}</textarea>\n"
            ));
            html.push_str(&format!("{ind}</div>\n"));
        }

        Affordance::Select(options) => {
            let nothing_selected = options.iter().all(|o| !o.checked);
            html.push_str(&format!("{ind}<div class=\"{class}\">\n"));
            html.push_str(&format!(
                "{ind}  <label for=\"{field_id}\">{label}</label>\n"
            ));
            html.push_str(&format!(
                "{ind}  <select id=\"{field_id}\" name=\"{name}\" class=\"{prefix}-select\"{required}{disabled}{invalid}>\n"
            ));
            html.push_str(&format!(
                "{ind}    <option value=\"\"{}>Select an option</option>\n",
                if nothing_selected { " selected" } else { "" }
            ));
            for option in options {
                let selected = if option.checked { " selected" } else { "" };
                let label = escape_html(&option.label);
                html.push_str(&format!(
                    "{ind}    <option value=\"{label}\"{selected}>{label}</option>\n"
                ));
            }
            html.push_str(&format!("{ind}  </select>\n"));
            html.push_str(&format!("{ind}</div>\n"));
        }

        Affordance::RadioGroup(options) => {
            html.push_str(&choice_fieldset(
                options, "radio", &field_id, &name, &label, prefix, &class, disabled,
            ));
        }

        Affordance::CheckboxGroup(options) => {
            html.push_str(&choice_fieldset(
                options, "checkbox", &field_id, &name, &label, prefix, &class, disabled,
            ));
        }
    }

    html
}

#[allow(clippy::too_many_arguments)]
fn choice_fieldset(
    options: &[ChoiceOption],
    input_type: &str,
    field_id: &str,
    name: &str,
    label: &str,
    prefix: &str,
    class: &str,
    disabled: &str,
) -> String {
    let ind = "    ";
    let mut html = String::new();
    html.push_str(&format!(
        "{ind}<fieldset class=\"{class} {prefix}-fieldset\">\n"
    ));
    html.push_str(&format!("{ind}  <legend>{label}</legend>\n"));
    for (idx, option) in options.iter().enumerate() {
        let option_id = format!("{field_id}-{idx}");
        let checked = if option.checked { " checked" } else { "" };
        let value = escape_html(&option.label);
        html.push_str(&format!(
            "{ind}  <div class=\"{prefix}-{input_type}-option\">\n"
        ));
        html.push_str(&format!(
            "{ind}    <input type=\"{input_type}\" id=\"{option_id}\" name=\"{name}\" value=\"{value}\"{checked}{disabled}>\n"
        ));
        html.push_str(&format!(
            "{ind}    <label for=\"{option_id}\">{value}</label>\n"
        ));
        html.push_str(&format!("{ind}  </div>\n"));
    }
    html.push_str(&format!("{ind}</fieldset>\n"));
    html
}

/// "1. Name *" for a required first question, already escaped.
fn label_text(field: &FieldView) -> String {
    let marker = if field.required { " *" } else { "" };
    format!("{}. {}{marker}", field.position, escape_html(field.name.as_str()))
}

/// Escape text for use in element content and quoted attribute values.
/// Question names, choice labels and answers all pass through here.
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Generate default CSS styles.
fn generate_styles(prefix: &str) -> String {
    format!(
        r#"  <style>
    .{prefix}-form, .{prefix}-report {{
      max-width: 720px;
      margin: 2rem auto;
      padding: 1rem;
      font-family: sans-serif;
    }}
    .{prefix}-description {{
      color: #555;
      white-space: pre-wrap;
    }}
    .{prefix}-field {{
      margin: 0.5rem 0;
    }}
    .{prefix}-field label {{
      display: block;
      margin-bottom: 0.25rem;
    }}
    .{prefix}-invalid label, .{prefix}-invalid legend {{
      color: #b00020;
    }}
    .{prefix}-input, .{prefix}-textarea, .{prefix}-select {{
      width: 100%;
      padding: 0.5rem;
      box-sizing: border-box;
    }}
    .{prefix}-fieldset {{
      margin: 1rem 0;
      padding: 1rem;
    }}
    .{prefix}-radio-option, .{prefix}-checkbox-option {{
      margin: 0.25rem 0;
    }}
    .{prefix}-radio-option label, .{prefix}-checkbox-option label {{
      display: inline;
    }}
    .{prefix}-submit {{
      margin-top: 1rem;
      padding: 0.5rem 1rem;
    }}
    .{prefix}-table {{
      width: 100%;
      border-collapse: collapse;
      font-size: 0.875rem;
    }}
    .{prefix}-table th, .{prefix}-table td {{
      text-align: left;
      padding: 0.5rem 1rem;
      border-top: 1px solid #ddd;
      vertical-align: top;
    }}
    .{prefix}-empty {{
      text-align: center;
      font-style: italic;
      color: #777;
    }}
  </style>
"#
    )
}

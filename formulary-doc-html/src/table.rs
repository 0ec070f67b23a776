//! Response report as an HTML table.

use formulary::{Cell, Report};

use crate::HtmlOptions;
use crate::generator::{escape_html, wrap_document};

/// Render a report: a response count followed by one table row per
/// retained response. Multi-value answers become a bulleted list.
pub fn report_to_html(report: &Report, options: &HtmlOptions) -> String {
    let prefix = &options.class_prefix;
    let mut body = String::new();

    body.push_str(&format!("<div class=\"{prefix}-report\">\n"));
    if let Some(title) = &options.title {
        body.push_str(&format!(
            "  <h1 class=\"{prefix}-title\">{}</h1>\n",
            escape_html(title)
        ));
    }
    body.push_str(&format!(
        "  <p class=\"{prefix}-total\">Total Responses: <strong>{}</strong></p>\n",
        report.total()
    ));

    body.push_str(&format!("  <table class=\"{prefix}-table\">\n"));
    body.push_str("    <thead>\n      <tr>\n");
    for column in &report.columns {
        body.push_str(&format!("        <th>{}</th>\n", escape_html(column)));
    }
    body.push_str("      </tr>\n    </thead>\n    <tbody>\n");

    if report.is_empty() {
        body.push_str(&format!(
            "      <tr><td colspan=\"{}\" class=\"{prefix}-empty\">No responses yet.</td></tr>\n",
            report.columns.len()
        ));
    }

    for row in &report.rows {
        body.push_str("      <tr>\n");
        for fixed in [&row.date, &row.name, &row.email] {
            body.push_str(&format!("        <td>{}</td>\n", escape_html(fixed)));
        }
        for cell in &row.cells {
            body.push_str(&format!(
                "        <td>{}</td>\n",
                render_cell(cell, &report.placeholder, prefix)
            ));
        }
        body.push_str("      </tr>\n");
    }

    body.push_str("    </tbody>\n  </table>\n</div>\n");

    if options.full_document {
        let title = options.title.as_deref().unwrap_or("Responses");
        wrap_document(title, &body, options)
    } else {
        body
    }
}

fn render_cell(cell: &Cell, placeholder: &str, prefix: &str) -> String {
    match cell {
        Cell::Placeholder => escape_html(placeholder),
        Cell::Text(text) => escape_html(text),
        Cell::List(items) => {
            let items: String = items
                .iter()
                .map(|item| format!("<li>{}</li>", escape_html(item)))
                .collect();
            format!("<ul class=\"{prefix}-list\">{items}</ul>")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formulary::ReportOptions;

    fn fragment() -> HtmlOptions {
        HtmlOptions::new().full_document(false)
    }

    #[test]
    fn empty_report_says_so() {
        let form = example_forms::event_registration();
        let report = Report::build(&form.questions, &[], &ReportOptions::default());
        let html = report_to_html(&report, &fragment());

        assert!(html.contains("Total Responses: <strong>0</strong>"));
        assert!(html.contains(&format!("colspan=\"{}\"", form.questions.len() + 3)));
        assert!(html.contains("No responses yet."));
    }

    #[test]
    fn historical_responses_are_filtered_and_listed() {
        let form = example_forms::event_registration();
        let responses = example_forms::historical_responses();
        let report = Report::build(&form.questions, &responses, &ReportOptions::default());
        let html = report_to_html(&report, &fragment());

        assert_eq!(report.total(), example_forms::RETAINED_HISTORICAL_RESPONSES);
        assert!(html.contains(&format!(
            "Total Responses: <strong>{}</strong>",
            example_forms::RETAINED_HISTORICAL_RESPONSES
        )));
        assert!(
            html.contains("<ul class=\"form-list\"><li>Workshops</li><li>Networking</li></ul>")
        );
        assert!(html.contains("<td>—</td>"));
        assert!(!html.contains("No responses yet."));
        assert!(!html.contains("Only Orphans"));
    }

    #[test]
    fn full_document_has_a_title() {
        let report = Report::build(&[], &[], &ReportOptions::default());
        let html = report_to_html(&report, &HtmlOptions::new());
        assert!(html.contains("<title>Responses</title>"));
    }
}

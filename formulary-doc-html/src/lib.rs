//! HTML rendering for formulary.
//!
//! Forms are rendered through the rendering contract, so a preview shows
//! exactly what a respondent would see, only disabled. Reports render as a
//! plain table.
//!
//! ```rust,ignore
//! use formulary::{AnswerState, Mode};
//! use formulary_doc_html::{HtmlOptions, form_to_html};
//!
//! let html = form_to_html(&form, Some(&answers), Mode::Capture, &HtmlOptions::new());
//! ```

mod generator;
pub use generator::{HtmlOptions, form_to_html};

mod table;
pub use table::report_to_html;

//! Prompt templates for ticker-brief
//!
//! Templates are written in Jinja2 syntax (rendered by MiniJinja) and may
//! carry one variant per [`Language`]. The report generator picks the variant
//! matching the report language and falls back to English, then to whatever
//! variant exists.
//!
//! ```
//! use brief_prompt::{JinjaTemplate, Language, PromptTemplate};
//! use serde_json::json;
//!
//! let template = JinjaTemplate::bilingual(
//!     "greeting",
//!     "Report for {{ symbol }}",
//!     "{{ symbol }} 分析報告",
//! ).unwrap();
//!
//! let zh = template
//!     .render(&Language::TraditionalChinese, &json!({ "symbol": "2330" }))
//!     .unwrap();
//! assert_eq!(zh, "2330 分析報告");
//! ```

mod error;
mod jinja;
mod language;
mod template;

pub use error::{PromptError, Result};
pub use jinja::{JinjaTemplate, JinjaTemplateBuilder};
pub use language::Language;
pub use template::PromptTemplate;

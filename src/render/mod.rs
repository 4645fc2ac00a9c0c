//! HTML output: entity sections, page wrappers and Markdown conversion.

pub mod html;
pub mod markdown;
pub mod page;

pub use html::DocumentWriter;

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

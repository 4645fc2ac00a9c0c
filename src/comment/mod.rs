//! Comment pipeline: raw proto comment in, HTML out.
//!
//! Steps, in order: source selection, indent normalization, heading
//! promotion, HTML-comment elision, typed-link substitution, prefix
//! stripping, directive-line removal, spell checking, Markdown rendering.

pub mod spell;
pub mod text;

use crate::context::DocContext;
use crate::diagnostics::Diagnostics;
use crate::linker;
use crate::model::Location;
use crate::render::markdown;
use spell::Speller;

/// Renders comments for one document.
pub struct Pipeline<'a, 'm> {
    pub ctx: &'a DocContext<'m>,
    pub speller: Option<&'a dyn Speller>,
}

impl<'a, 'm> Pipeline<'a, 'm> {
    pub fn new(ctx: &'a DocContext<'m>, speller: Option<&'a dyn Speller>) -> Self {
        Self { ctx, speller }
    }

    /// Render the comment at `loc` to HTML followed by a newline.
    ///
    /// Returns `None`, after warning, when the element has no comment.
    pub fn render(&self, diagnostics: &mut Diagnostics, loc: &Location, name: &str) -> Option<String> {
        let text = self.markdown(diagnostics, loc, name)?;
        let mut html = markdown::to_html(&text);
        html.push('\n');
        Some(html)
    }

    /// Run every step except the final Markdown rendering.
    pub fn markdown(&self, diagnostics: &mut Diagnostics, loc: &Location, name: &str) -> Option<String> {
        let Some(source) = text::select_source(loc) else {
            diagnostics.warn(loc, 0, format!("no comment found for {}", name));
            return None;
        };

        let mut lines = text::split_lines(source);
        text::normalize_indent(&mut lines);
        text::promote_headings(&mut lines, self.ctx.grouping);
        text::elide_html_comments(&mut lines);

        let total = lines.len() as i32;
        text::substitute_type_links(&mut lines, |display, type_name, index| {
            self.type_link(display, type_name).unwrap_or_else(|| {
                diagnostics.warn(
                    loc,
                    -(total - index as i32),
                    format!("unresolved type link [{}][{}]", display, type_name),
                );
                format!("*{}*", display)
            })
        });

        text::strip_prefixes(&mut lines);
        text::drop_directive_lines(&mut lines);

        if let Some(speller) = self.speller {
            let total = lines.len() as i32;
            spell::check_spelling(&lines, speller, |index, word| {
                diagnostics.warn(loc, -(total - index as i32), format!("{} is misspelled", word));
            });
        }

        Some(lines.join("\n"))
    }

    fn type_link(&self, display: &str, type_name: &str) -> Option<String> {
        let model = self.ctx.model;
        if let Some(desc) = model.lookup(&format!(".{}", type_name)) {
            return Some(linker::resolve(self.ctx, Some(desc), display, false));
        }
        linker::well_known_url(type_name).map(|url| linker::anchor_tag(&url, display))
    }
}

//! Markdown to HTML conversion for comment text.

use pulldown_cmark::{html, Options, Parser};

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render Markdown, passing inline HTML (such as resolved type links) through.
pub fn to_html(text: &str) -> String {
    let parser = Parser::new_ext(text, options());
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_and_paragraph() {
        assert_eq!(to_html("### Title\nbody text"), "<h3>Title</h3>\n<p>body text</p>\n");
    }

    #[test]
    fn inline_links_pass_through() {
        assert_eq!(
            to_html("see <a href=\"#Foo\">Foo</a> and *Bar*"),
            "<p>see <a href=\"#Foo\">Foo</a> and <em>Bar</em></p>\n"
        );
    }

    #[test]
    fn fenced_code() {
        assert_eq!(
            to_html("```yaml\nkey: 1\n```"),
            "<pre><code class=\"language-yaml\">key: 1\n</code></pre>\n"
        );
    }
}

//! Pure text transforms applied to a comment, one function per step.
//!
//! The order in which [`super::Pipeline`] runs them matters: indentation is
//! stripped before headings are detected, and HTML comments are elided before
//! type links are substituted.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::model::Location;

static RE_TYPE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\[([^\]]*)\]").unwrap());

/// Leading comment, else trailing comment, else nothing.
pub fn select_source(loc: &Location) -> Option<&str> {
    if !loc.leading.is_empty() {
        Some(&loc.leading)
    } else if !loc.trailing.is_empty() {
        Some(&loc.trailing)
    } else {
        None
    }
}

/// Split a comment into lines, dropping the final newline.
pub fn split_lines(text: &str) -> Vec<String> {
    text.strip_suffix('\n')
        .unwrap_or(text)
        .split('\n')
        .map(str::to_string)
        .collect()
}

/// Remove the first line's indentation from every line.
///
/// Each line loses at most that many leading whitespace characters and never
/// anything past its first non-whitespace character, so relative indentation
/// inside code blocks survives.
pub fn normalize_indent(lines: &mut [String]) -> usize {
    let Some(first) = lines.first() else {
        return 0;
    };
    let pad = first
        .chars()
        .position(|c| !c.is_whitespace())
        .unwrap_or(0);

    for line in lines.iter_mut() {
        let strip: usize = line
            .chars()
            .take(pad)
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum();
        line.drain(..strip);
    }
    pad
}

/// Push Markdown headings below the heading of the section they document.
pub fn promote_headings(lines: &mut [String], grouping: bool) {
    let extra = if grouping { "###" } else { "##" };
    for line in lines.iter_mut().filter(|l| l.starts_with('#')) {
        line.insert_str(0, extra);
    }
}

/// Remove `<!-- ... -->` spans, including ones running over several lines.
pub fn elide_html_comments(lines: &mut [String]) {
    let mut i = 0;
    while i < lines.len() {
        let Some(start) = lines[i].find("<!--") else {
            i += 1;
            continue;
        };

        if let Some(len) = lines[i][start + 4..].find("-->") {
            let end = start + 4 + len + 3;
            lines[i].replace_range(start..end, "");
            continue;
        }

        lines[i].truncate(start);
        i += 1;
        while i < lines.len() {
            if let Some(end) = lines[i].find("-->") {
                // rescan the remainder of this line
                lines[i].replace_range(..end + 3, "");
                break;
            }
            lines[i].clear();
            i += 1;
        }
    }
}

/// Replace every `[display][type]` with whatever `link` returns for it.
///
/// `link` receives the display text, the type name and the line index.
pub fn substitute_type_links(
    lines: &mut [String],
    mut link: impl FnMut(&str, &str, usize) -> String,
) {
    for (index, line) in lines.iter_mut().enumerate() {
        if !RE_TYPE_LINK.is_match(line) {
            continue;
        }
        let replaced = RE_TYPE_LINK
            .replace_all(line, |caps: &Captures<'_>| link(&caps[1], &caps[2], index))
            .into_owned();
        *line = replaced;
    }
}

/// Drop the `Required. ` / `Optional. ` prefixes field comments often carry.
pub fn strip_prefixes(lines: &mut [String]) {
    for line in lines.iter_mut() {
        if let Some(rest) = line
            .strip_prefix("Required. ")
            .or_else(|| line.strip_prefix("Optional. "))
        {
            *line = rest.to_string();
        }
    }
}

/// Remove `+directive` lines meant for tooling, not readers.
pub fn drop_directive_lines(lines: &mut Vec<String>) {
    lines.retain(|line| !line.starts_with('+'));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        split_lines(text)
    }

    #[test]
    fn source_falls_back_to_trailing() {
        let mut loc = Location {
            trailing: " trailing\n".to_string(),
            ..Default::default()
        };
        assert_eq!(select_source(&loc), Some(" trailing\n"));
        loc.leading = " leading\n".to_string();
        assert_eq!(select_source(&loc), Some(" leading\n"));
        assert_eq!(select_source(&Location::default()), None);
    }

    #[test]
    fn indent_keeps_relative_indentation() {
        let mut l = lines("  Example:\n\n      code here\n    more\n  done\n");
        let pad = normalize_indent(&mut l);
        assert_eq!(pad, 2);
        assert_eq!(l, vec!["Example:", "", "    code here", "  more", "done"]);
    }

    #[test]
    fn indent_stops_at_text() {
        let mut l = lines("    First\n  second\nthird");
        normalize_indent(&mut l);
        assert_eq!(l, vec!["First", "second", "third"]);
    }

    #[test]
    fn indent_round_trips() {
        let original = vec![" Para one.", "", "     indented", " ```", "   x = 1", " ```"];
        let mut l: Vec<String> = original.iter().map(|s| s.to_string()).collect();
        let pad = normalize_indent(&mut l);
        let restored: Vec<String> = l
            .iter()
            .zip(&original)
            .map(|(line, orig)| {
                if orig.is_empty() {
                    line.clone()
                } else {
                    format!("{}{}", " ".repeat(pad), line)
                }
            })
            .collect();
        assert_eq!(restored, original);
    }

    #[test]
    fn headings_promoted_by_grouping() {
        let mut l = lines("# Title\nnot # a heading\n## Sub");
        promote_headings(&mut l, false);
        assert_eq!(l, vec!["### Title", "not # a heading", "#### Sub"]);

        let mut l = lines("# Title");
        promote_headings(&mut l, true);
        assert_eq!(l, vec!["#### Title"]);
    }

    #[test]
    fn html_comments_single_line() {
        let mut l = lines("a <!-- x --> b <!-- y --> c\nplain");
        elide_html_comments(&mut l);
        assert_eq!(l, vec!["a  b  c", "plain"]);
    }

    #[test]
    fn html_comments_multi_line() {
        let mut l = lines("keep <!-- start\nhidden\nstill hidden --> tail <!-- again -->!\nafter");
        elide_html_comments(&mut l);
        assert_eq!(l, vec!["keep ", "", " tail !", "after"]);
    }

    #[test]
    fn html_comments_unterminated() {
        let mut l = lines("a <!-- open\nb\nc");
        elide_html_comments(&mut l);
        assert_eq!(l, vec!["a ", "", ""]);
    }

    #[test]
    fn html_comment_elision_is_idempotent() {
        let mut l = lines("x <!-- a -->y<!--\nz\n-->w <!-- q");
        elide_html_comments(&mut l);
        let once = l.clone();
        elide_html_comments(&mut l);
        assert_eq!(l, once);
    }

    #[test]
    fn type_links_are_substituted() {
        let mut l = lines("See [Foo][pkg.Bar] and [Baz][pkg.Qux].\nnone here");
        let mut seen = Vec::new();
        substitute_type_links(&mut l, |display, ty, index| {
            seen.push((display.to_string(), ty.to_string(), index));
            format!("<{}>", display)
        });
        assert_eq!(l[0], "See <Foo> and <Baz>.");
        assert_eq!(
            seen,
            vec![
                ("Foo".to_string(), "pkg.Bar".to_string(), 0),
                ("Baz".to_string(), "pkg.Qux".to_string(), 0)
            ]
        );
    }

    #[test]
    fn prefixes_only_at_line_start() {
        let mut l = lines("Required. The name.\nOptional. A size.\nNot Required. here\nRequired.no space");
        strip_prefixes(&mut l);
        assert_eq!(
            l,
            vec!["The name.", "A size.", "Not Required. here", "Required.no space"]
        );
    }

    #[test]
    fn directive_lines_dropped() {
        let mut l = lines("Text\n+kubebuilder:validation:Required\n +kept\nmore");
        drop_directive_lines(&mut l);
        assert_eq!(l, vec!["Text", " +kept", "more"]);
    }
}

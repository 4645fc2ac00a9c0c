//! `$`-annotations embedded in proto comments.
//!
//! A comment line whose trimmed text starts with `$` is metadata, not prose:
//!
//! - `$hide_from_docs` hides the element;
//! - `$class: experimental` tags the element with a CSS class;
//! - on a package statement, `$title:`, `$overview:`, `$description:`,
//!   `$location:`, `$mode:` and `$front_matter:` fill the file's front matter.
//!
//! Annotation lines are removed from the comment text. Lines inside fenced
//! code blocks are never annotations.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::model::{FrontMatter, Mode};

static RE_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\$([A-Za-z_][A-Za-z0-9_]*)(?::\s*(.*?))?\s*$").unwrap());

/// A comment with its annotations split out.
#[derive(Debug, Default)]
pub struct Annotated {
    pub text: String,
    pub hidden: bool,
    pub class: Option<String>,
    /// Remaining `(key, value)` annotations in order of appearance.
    pub directives: Vec<(String, String)>,
}

pub fn extract(comment: &str) -> Annotated {
    let mut out = Annotated::default();
    let mut kept: Vec<&str> = Vec::new();
    let mut in_code = false;

    for line in comment.split('\n') {
        if line.trim_start().starts_with("```") {
            in_code = !in_code;
        }
        let caps = if in_code { None } else { RE_ANNOTATION.captures(line) };
        let Some(caps) = caps else {
            kept.push(line);
            continue;
        };
        let key = &caps[1];
        let value = caps.get(2).map_or("", |m| m.as_str());
        match key {
            "hide_from_docs" => out.hidden = true,
            "class" if !value.is_empty() => out.class = Some(value.to_string()),
            _ => out.directives.push((key.to_string(), value.to_string())),
        }
    }

    if kept.iter().any(|l| !l.trim().is_empty()) {
        out.text = kept.join("\n");
    }
    out
}

/// Build a file's front matter from its package-comment directives.
pub fn front_matter(file: &str, directives: &[(String, String)]) -> Result<FrontMatter> {
    let mut matter = FrontMatter::default();

    for (key, value) in directives {
        let value = value.clone();
        match key.as_str() {
            "title" => matter.title = Some(value),
            "overview" => matter.overview = Some(value),
            "description" => matter.description = Some(value),
            "location" => matter.home_location = Some(value),
            "front_matter" => matter.extra.push(value),
            "mode" => {
                matter.mode = Mode::parse(&value).ok_or_else(|| Error::UnknownMode {
                    file: file.to_string(),
                    value: value.clone(),
                })?;
            }
            _ if value.is_empty() => {}
            other => matter.extra.push(format!("{}: {}", other, value)),
        }
    }

    Ok(matter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_hide_and_class() {
        let a = extract(" $hide_from_docs\n $class: experimental\n Body text.\n");
        assert!(a.hidden);
        assert_eq!(a.class.as_deref(), Some("experimental"));
        assert_eq!(a.text, " Body text.\n");
    }

    #[test]
    fn annotation_only_comment_is_empty() {
        let a = extract(" $title: Foo\n");
        assert_eq!(a.text, "");
        assert_eq!(a.directives, vec![("title".to_string(), "Foo".to_string())]);
    }

    #[test]
    fn dollar_inside_prose_is_kept() {
        let a = extract(" Costs $5 per call.\n");
        assert_eq!(a.text, " Costs $5 per call.\n");
        assert!(a.directives.is_empty());
    }

    #[test]
    fn fenced_code_is_not_annotated() {
        let a = extract(" Example:\n ```sh\n $HOME\n ```\n $class: beta\n");
        assert_eq!(a.text, " Example:\n ```sh\n $HOME\n ```\n");
        assert!(a.directives.is_empty());
        assert_eq!(a.class.as_deref(), Some("beta"));
    }

    #[test]
    fn front_matter_fields() {
        let a = extract(
            " $title: Mixer\n $overview: Short\n $location: https://example.com/mixer.html\n \
             $mode: package\n $front_matter: weight: 20\n $aliases: /docs/old\n Body\n",
        );
        let fm = front_matter("mixer.proto", &a.directives).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Mixer"));
        assert_eq!(fm.overview.as_deref(), Some("Short"));
        assert_eq!(fm.home_location.as_deref(), Some("https://example.com/mixer.html"));
        assert_eq!(fm.mode, Mode::PerPackage);
        assert_eq!(fm.extra, vec!["weight: 20", "aliases: /docs/old"]);
        assert_eq!(a.text, " Body\n");
    }

    #[test]
    fn unknown_mode_is_an_error() {
        let a = extract(" $mode: everything\n");
        let err = front_matter("x.proto", &a.directives).unwrap_err();
        assert!(err.to_string().contains("everything"));
    }
}

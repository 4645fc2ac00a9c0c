//! Generator options.
//!
//! Options come from CLI flags and, optionally, a protoc-style parameter
//! string (`mode=html_fragment,warnings=false,per_file=true`).

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Shape of each generated document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Stand-alone HTML page.
    #[default]
    Page,
    /// Body content only, no head section or other wrappers.
    Fragment,
    /// Like a fragment, preceded by YAML front matter.
    FragmentWithFrontMatter,
}

impl OutputMode {
    /// Parse a mode name, accepting both the CLI and the protoc names.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "page" | "html_page" => Ok(OutputMode::Page),
            "fragment" | "html_fragment" => Ok(OutputMode::Fragment),
            "fragment-with-front-matter" | "html_fragment_with_front_matter" | "jekyll_html" => {
                Ok(OutputMode::FragmentWithFrontMatter)
            }
            _ => Err(Error::InvalidOption {
                key: "mode".to_string(),
                value: name.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Options {
    pub mode: OutputMode,
    /// Print warnings; they are counted either way.
    pub warnings: bool,
    pub warnings_as_errors: bool,
    /// Copy pass-through front matter lines into the YAML block.
    pub front_matter_extras: bool,
    pub camel_case_fields: bool,
    /// URL of a stylesheet replacing the built-in style.
    pub stylesheet: Option<String>,
    /// Documents speak for single files rather than whole packages.
    pub per_file: bool,
    /// Hunspell `.dic` files (with their `.aff`) or plain word lists.
    /// Loaded by the generator; any entry enables the spell checker.
    pub dictionaries: Vec<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            warnings: true,
            warnings_as_errors: false,
            front_matter_extras: true,
            camel_case_fields: false,
            stylesheet: None,
            per_file: false,
            dictionaries: Vec::new(),
        }
    }
}

impl Options {
    /// Apply a comma-separated `key=value` parameter string.
    ///
    /// A key without a value is read as `key=true`.
    pub fn apply_parameter(&mut self, parameter: &str) -> Result<()> {
        for item in parameter.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = item.split_once('=').unwrap_or((item, "true"));
            let (key, value) = (key.trim(), value.trim());
            match key {
                "mode" => self.mode = OutputMode::from_name(value)?,
                "warnings" => self.warnings = parse_bool(key, value)?,
                "warnings_as_errors" => self.warnings_as_errors = parse_bool(key, value)?,
                "emit_yaml" | "front_matter_extras" => {
                    self.front_matter_extras = parse_bool(key, value)?
                }
                "camel_case_fields" => self.camel_case_fields = parse_bool(key, value)?,
                "custom_style_sheet" => {
                    self.stylesheet = (!value.is_empty()).then(|| value.to_string())
                }
                "per_file" => self.per_file = parse_bool(key, value)?,
                "dictionary" | "custom_word_list" => self.dictionaries.push(PathBuf::from(value)),
                _ => return Err(Error::UnknownOption(key.to_string())),
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidOption {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = Options::default();
        assert_eq!(o.mode, OutputMode::Page);
        assert!(o.warnings);
        assert!(o.front_matter_extras);
        assert!(!o.per_file);
    }

    #[test]
    fn parameter_string() {
        let mut o = Options::default();
        o.apply_parameter(
            "mode=html_fragment_with_front_matter, warnings=false,per_file,\
             custom_style_sheet=https://x.dev/s.css,dictionary=en.dic,custom_word_list=extra.txt",
        )
        .unwrap();
        assert_eq!(o.mode, OutputMode::FragmentWithFrontMatter);
        assert!(!o.warnings);
        assert!(o.per_file);
        assert_eq!(o.stylesheet.as_deref(), Some("https://x.dev/s.css"));
        assert_eq!(
            o.dictionaries,
            vec![PathBuf::from("en.dic"), PathBuf::from("extra.txt")]
        );
    }

    #[test]
    fn bad_parameters() {
        let mut o = Options::default();
        assert!(matches!(
            o.apply_parameter("colour=blue"),
            Err(Error::UnknownOption(k)) if k == "colour"
        ));
        assert!(o.apply_parameter("warnings=maybe").is_err());
        assert!(OutputMode::from_name("pdf").is_err());
    }
}

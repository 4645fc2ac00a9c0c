//! Spell checking of comment prose.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use regex::Regex;
use spellbook::Dictionary;
use std::sync::LazyLock;

use crate::error::{Error, Result};

static RE_CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(`.*`)").unwrap());

static RE_MARKDOWN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*\]\((.*)\)").unwrap());

static RE_HTML_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(<a href=".*">)"#).unwrap());

/// Dictionary plus the tokenizer that feeds it.
pub trait Speller {
    /// Break a line of prose into the words worth checking.
    fn split(&self, line: &str) -> Vec<String> {
        split_words(line)
    }

    /// Whether `word` is spelled correctly.
    fn check(&self, word: &str) -> bool;
}

/// Speller backed by plain word lists, one word per line.
#[derive(Debug, Default)]
pub struct WordListSpeller {
    words: HashSet<String>,
}

impl WordListSpeller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every word of a list. Blank lines and `#` comments are skipped.
    pub fn add_word_list(&mut self, content: &str) {
        for line in content.lines().map(str::trim) {
            if !line.is_empty() && !line.starts_with('#') {
                self.words.insert(line.to_string());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Speller for WordListSpeller {
    fn check(&self, word: &str) -> bool {
        self.words.contains(word) || self.words.contains(&word.to_lowercase())
    }
}

/// Hunspell dictionaries (`.dic` plus `.aff`) and extra word lists.
///
/// A word is accepted when any of them knows it, so inflected forms
/// follow the affix rules of the loaded dictionaries.
#[derive(Default)]
pub struct DictionarySpeller {
    dictionaries: Vec<Dictionary>,
    words: WordListSpeller,
}

impl DictionarySpeller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load each path. A `.dic` file needs its `.aff` file next to it;
    /// anything else is read as a plain word list.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut speller = Self::new();
        for path in paths {
            let path = path.as_ref();
            let content = read(path)?;
            if path.extension().and_then(|e| e.to_str()) == Some("dic") {
                let aff = read(&path.with_extension("aff"))?;
                speller.add_hunspell(path, &aff, &content)?;
            } else {
                speller.add_word_list(&content);
            }
        }
        Ok(speller)
    }

    /// Add a hunspell dictionary; `path` only names it in errors.
    pub fn add_hunspell(&mut self, path: &Path, aff: &str, dic: &str) -> Result<()> {
        let dictionary = Dictionary::new(aff, dic).map_err(|err| Error::Dictionary {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        self.dictionaries.push(dictionary);
        Ok(())
    }

    pub fn add_word_list(&mut self, content: &str) {
        self.words.add_word_list(content);
    }

    pub fn dictionary_count(&self) -> usize {
        self.dictionaries.len()
    }
}

impl Speller for DictionarySpeller {
    fn check(&self, word: &str) -> bool {
        self.dictionaries.iter().any(|d| d.check(word)) || self.words.check(word)
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Words of `line`, leaving out identifiers, numbers and paths.
pub fn split_words(line: &str) -> Vec<String> {
    line.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| {
            !token.is_empty()
                && !token.contains(|c: char| {
                    c.is_ascii_digit() || matches!(c, '_' | '.' | '/' | ':' | '@' | '=')
                })
        })
        .flat_map(|token| token.split(|c: char| !(c.is_alphabetic() || c == '\'')))
        .map(|word| word.trim_matches('\''))
        .filter(|word| word.chars().count() > 1 && !looks_like_identifier(word))
        .map(str::to_string)
        .collect()
}

/// `CamelCase`, `mixedCase` and `ACRONYMS` are names, not prose.
fn looks_like_identifier(word: &str) -> bool {
    word.chars().skip(1).any(char::is_uppercase)
}

/// Remove code spans and link targets, which are not prose.
pub fn sanitize(line: &str) -> String {
    let line = RE_MARKDOWN_URL.replace_all(line, "");
    let line = RE_HTML_URL.replace_all(&line, "");
    RE_CODE_SPAN.replace_all(&line, "").into_owned()
}

/// Run `speller` over the prose of `lines`, skipping fenced code blocks.
///
/// `report` gets the line index and each misspelled word.
pub fn check_spelling(lines: &[String], speller: &dyn Speller, mut report: impl FnMut(usize, &str)) {
    let mut in_code = false;
    for (index, line) in lines.iter().enumerate() {
        if line.trim_matches(' ').starts_with("```") {
            in_code = !in_code;
            continue;
        }
        if in_code {
            continue;
        }

        let prose = sanitize(line);
        for word in speller.split(&prose) {
            if !speller.check(&word) {
                report(index, &word);
            }
        }
    }
}

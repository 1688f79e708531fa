//! Phrase and markup patterns
//!
//! Phrase lists are compiled into a single case-insensitive alternation.
//! A phrase edge made of a word character gets a `\b` assertion, so "best"
//! never fires inside "bestow" while "#1" still matches after a space.

use lazy_static::lazy_static;
use listforge_core::text::{contains_phrase, dedupe_case_insensitive};
use listforge_core::{Error, Result};
use regex::Regex;

lazy_static! {
    /// HTML or XML tag
    static ref HTML_TAG_PATTERN: Regex = Regex::new(r"<[^>]+>").unwrap();

    /// Web address
    static ref URL_PATTERN: Regex =
        Regex::new(r"(?i)(?:https?://|www\.)[^\s<>]+").unwrap();
}

pub fn contains_html(text: &str) -> bool {
    HTML_TAG_PATTERN.is_match(text)
}

pub fn contains_url(text: &str) -> bool {
    URL_PATTERN.is_match(text)
}

/// Remove HTML tags and URLs, repeating until neither pattern matches
pub fn strip_markup(text: &str) -> String {
    let mut out = text.to_string();
    while contains_html(&out) || contains_url(&out) {
        let without_tags = HTML_TAG_PATTERN.replace_all(&out, " ");
        out = URL_PATTERN.replace_all(&without_tags, " ").into_owned();
    }
    out
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Matches any phrase from a fixed list, whole-word and case-insensitively
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    phrases: Vec<String>,
    pattern: Option<Regex>,
}

impl PhraseMatcher {
    pub fn new<I, S>(phrases: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = dedupe_case_insensitive(
            phrases.into_iter().map(|p| p.as_ref().trim().to_lowercase()),
        );

        if phrases.is_empty() {
            return Ok(Self {
                phrases,
                pattern: None,
            });
        }

        // Longer phrases first so "top rated" is consumed before "top"
        let mut ordered: Vec<&String> = phrases.iter().collect();
        ordered.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

        let alternatives: Vec<String> = ordered.iter().map(|p| Self::alternative(p)).collect();
        let source = format!("(?i)(?:{})", alternatives.join("|"));
        let pattern = Regex::new(&source)
            .map_err(|e| Error::InvalidConfig(format!("invalid phrase list: {e}")))?;

        Ok(Self {
            phrases,
            pattern: Some(pattern),
        })
    }

    fn alternative(phrase: &str) -> String {
        let mut alt = String::new();
        if phrase.starts_with(is_word_char) {
            alt.push_str(r"\b");
        }
        // Inner spaces match any whitespace run
        alt.push_str(&regex::escape(phrase).replace(' ', r"\s+"));
        if phrase.ends_with(is_word_char) {
            alt.push_str(r"\b");
        }
        alt
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(text))
    }

    /// Listed phrases occurring in the text, in list order
    ///
    /// Each phrase is tested on its own, so overlapping entries such as
    /// "top rated" and "top" are both reported.
    pub fn find_all(&self, text: &str) -> Vec<&str> {
        if self.pattern.is_none() {
            return Vec::new();
        }
        self.phrases
            .iter()
            .filter(|p| contains_phrase(text, p))
            .map(String::as_str)
            .collect()
    }

    /// Remove every occurrence, leaving whitespace to be collapsed by the caller
    ///
    /// Removal repeats until nothing matches, so a phrase that only appears
    /// once its neighbour is removed ("free best shipping") goes too.
    pub fn strip(&self, text: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return text.to_string();
        };
        let mut out = text.to_string();
        while pattern.is_match(&out) {
            out = pattern.replace_all(&out, " ").into_owned();
        }
        out
    }
}

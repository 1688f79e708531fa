//! Unicode-aware text helpers shared by the classifier, generator and validator.
//!
//! Lengths are measured in Unicode scalar values (`char`s), never bytes,
//! except where a marketplace rule is explicitly byte-based.

use ahash::AHashSet;

/// Ellipsis appended by hard truncation
pub const ELLIPSIS: &str = "...";

/// Split text into lowercase word tokens
///
/// A word is a run of alphanumeric characters, optionally joined by inner
/// hyphens or apostrophes ("bpa-free", "kid's"). Leading and trailing joiners
/// are trimmed.
pub fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '\''))
        .map(|s| s.trim_matches(|c: char| c == '-' || c == '\''))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Number of characters in a string
#[inline]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Truncate to `max_chars` characters, ending in an ellipsis when cut
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if char_len(text) <= max_chars {
        return text.to_string();
    }
    let ellipsis_len = char_len(ELLIPSIS);
    if max_chars <= ellipsis_len {
        return text.chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - ellipsis_len).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Replace every whitespace run with a single space and trim both ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse whitespace inside paragraphs while keeping blank-line breaks
pub fn normalize_paragraphs(text: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(collapse_whitespace(&current.join(" ")));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(collapse_whitespace(&current.join(" ")));
    }

    paragraphs
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Upper-case the first character, leaving the rest untouched
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Join items as natural English: "a", "a and b", "a, b and c"
pub fn join_natural<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|s| s.as_ref()).collect();
            format!("{} and {}", head.join(", "), last.as_ref())
        }
    }
}

/// De-duplicate case-insensitively, keeping the first occurrence and order
pub fn dedupe_case_insensitive<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = AHashSet::new();
    let mut out = Vec::new();
    for item in items {
        let item = item.as_ref().trim();
        if item.is_empty() {
            continue;
        }
        if seen.insert(item.to_lowercase()) {
            out.push(item.to_string());
        }
    }
    out
}

/// Whether `text` contains `phrase` delimited by non-word characters
///
/// Both arguments are compared case-insensitively.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    let text = text.to_lowercase();
    let phrase = phrase.to_lowercase();
    if phrase.is_empty() {
        return false;
    }
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    let mut start = 0;
    while let Some(pos) = text[start..].find(&phrase) {
        let begin = start + pos;
        let end = begin + phrase.len();
        let before_ok = !phrase.starts_with(is_word)
            || text[..begin].chars().next_back().map_or(true, |c| !is_word(c));
        let after_ok = !phrase.ends_with(is_word)
            || text[end..].chars().next().map_or(true, |c| !is_word(c));
        if before_ok && after_ok {
            return true;
        }
        start = begin + phrase.chars().next().map_or(1, char::len_utf8);
    }
    false
}

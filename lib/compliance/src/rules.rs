//! Declarative marketplace rule set
//!
//! One [`RuleSet`] drives both the generator's inline cleanup and the
//! validator, so generated text is held to the same lists it is checked
//! against.

use serde::{Deserialize, Serialize};

/// Phrases that may not appear anywhere in a listing
pub const DEFAULT_BANNED_PHRASES: &[&str] = &[
    "best",
    "#1",
    "number one",
    "top rated",
    "top",
    "award winning",
    "guaranteed",
    "guarantee",
    "warranty",
    "free shipping",
    "free delivery",
    "cheap",
    "cheapest",
    "bargain",
    "discount",
    "sale",
    "amazon's choice",
    "amazon",
    "prime",
    "covid",
    "coronavirus",
    "pandemic",
    "cure",
    "treatment",
    "heal",
];

/// Phrases that read as advertising copy
pub const DEFAULT_PROMOTIONAL_PHRASES: &[&str] = &[
    "limited time",
    "act now",
    "don't miss",
    "hurry",
    "exclusive",
    "special offer",
    "deal of the day",
    "money back",
    "risk free",
    "no risk",
];

pub const DEFAULT_FORBIDDEN_TITLE_CHARS: &[char] = &['!', '@', '#', '$', '%', '*', '~'];

/// Words kept lowercase inside a title
pub const DEFAULT_MINOR_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with",
];

pub const DEFAULT_RECOMMENDED_ATTRIBUTES: &[&str] = &["brand", "color", "material"];

/// Length and count limits per listing field
///
/// Character limits count Unicode scalar values; the search-term limit
/// counts UTF-8 bytes of the space-joined terms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FieldLimits {
    pub title_max_chars: usize,
    pub title_min_chars: usize,
    pub bullet_max_chars: usize,
    pub bullet_min_chars: usize,
    pub min_bullets: usize,
    pub max_bullets: usize,
    pub description_max_chars: usize,
    pub description_min_chars: usize,
    pub search_terms_max_bytes: usize,
    pub max_search_terms: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            title_max_chars: 200,
            title_min_chars: 20,
            bullet_max_chars: 256,
            bullet_min_chars: 10,
            min_bullets: 3,
            max_bullets: 5,
            description_max_chars: 2000,
            description_min_chars: 50,
            search_terms_max_bytes: 249,
            max_search_terms: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleSet {
    pub banned_phrases: Vec<String>,
    pub promotional_phrases: Vec<String>,
    pub forbidden_title_chars: Vec<char>,
    pub minor_words: Vec<String>,
    pub recommended_attributes: Vec<String>,
    pub limits: FieldLimits,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            banned_phrases: owned(DEFAULT_BANNED_PHRASES),
            promotional_phrases: owned(DEFAULT_PROMOTIONAL_PHRASES),
            forbidden_title_chars: DEFAULT_FORBIDDEN_TITLE_CHARS.to_vec(),
            minor_words: owned(DEFAULT_MINOR_WORDS),
            recommended_attributes: owned(DEFAULT_RECOMMENDED_ATTRIBUTES),
            limits: FieldLimits::default(),
        }
    }
}

impl RuleSet {
    pub fn is_minor_word(&self, word: &str) -> bool {
        self.minor_words.iter().any(|m| m.eq_ignore_ascii_case(word))
    }

    pub fn is_forbidden_title_char(&self, c: char) -> bool {
        self.forbidden_title_chars.contains(&c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rules = RuleSet::default();
        assert_eq!(rules.limits.title_max_chars, 200);
        assert_eq!(rules.limits.search_terms_max_bytes, 249);
        assert!(rules.banned_phrases.iter().any(|p| p == "free shipping"));
        assert!(rules.is_minor_word("With"));
        assert!(rules.is_forbidden_title_char('~'));
        assert!(!rules.is_forbidden_title_char('-'));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let rules: RuleSet = serde_json::from_str(
            r#"{"banned_phrases": ["lorem"], "limits": {"title_max_chars": 80}}"#,
        )
        .unwrap();

        assert_eq!(rules.banned_phrases, vec!["lorem"]);
        assert_eq!(rules.limits.title_max_chars, 80);
        assert_eq!(rules.limits.bullet_max_chars, 256);
        assert_eq!(rules.minor_words.len(), DEFAULT_MINOR_WORDS.len());
    }
}

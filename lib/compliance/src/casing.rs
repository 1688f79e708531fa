//! Title casing rules
//!
//! A title is title-cased when its first word and every non-minor word
//! start with an uppercase letter and every later minor word starts
//! lowercase. Words that do not start with a cased letter ("4-pack",
//! "...", "#") are ignored.

use crate::rules::RuleSet;

/// At least one cased letter and no lowercase letters
pub fn is_all_caps(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// Letters of a word, lowercased, for minor-word lookup
fn letters(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase()
}

pub fn is_title_case(text: &str, rules: &RuleSet) -> bool {
    text.split_whitespace().enumerate().all(|(i, word)| {
        let first = match word.chars().next() {
            Some(c) if is_cased(c) => c,
            _ => return true,
        };
        if i > 0 && rules.is_minor_word(&letters(word)) {
            first.is_lowercase()
        } else {
            first.is_uppercase()
        }
    })
}

/// Upper-case the first character when its mapping is a single character,
/// keeping the character count unchanged
pub fn capitalize_in_place(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut upper = first.to_uppercase();
    let mapped = match (upper.next(), upper.next()) {
        (Some(c), None) => c,
        _ => first,
    };

    std::iter::once(mapped).chain(chars).collect()
}

/// Title-case a string
///
/// An all-caps input is lowered first; otherwise only first letters change,
/// so acronyms like "USB" survive. Whitespace is collapsed to single spaces.
pub fn to_title_case(text: &str, rules: &RuleSet) -> String {
    let lower_first = is_all_caps(text);

    text.split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let word = if lower_first {
                word.to_lowercase()
            } else {
                word.to_string()
            };
            if i > 0 && rules.is_minor_word(&letters(&word)) {
                word.to_lowercase()
            } else {
                capitalize_in_place(&word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_all_caps() {
        assert!(is_all_caps("STEEL BOTTLE 750ML"));
        assert!(!is_all_caps("Steel Bottle"));
        assert!(!is_all_caps("750 - 1000"));
    }

    #[test]
    fn test_is_title_case() {
        let rules = RuleSet::default();
        assert!(is_title_case("Insulated Bottle for the Gym", &rules));
        assert!(is_title_case("The Bottle", &rules));
        assert!(is_title_case("USB Cable with 2-pack Adapters", &rules));
        assert!(!is_title_case("Insulated bottle", &rules));
        assert!(!is_title_case("Bottle For Travel", &rules));
        assert!(is_title_case("", &rules));
    }

    #[test]
    fn test_to_title_case() {
        let rules = RuleSet::default();
        assert_eq!(
            to_title_case("insulated bottle FOR the gym", &rules),
            "Insulated Bottle for the Gym"
        );
        assert_eq!(to_title_case("the USB cable", &rules), "The USB Cable");
        assert_eq!(to_title_case("STEEL BOTTLE WITH LID", &rules), "Steel Bottle with Lid");
    }

    #[test]
    fn test_to_title_case_output_is_title_case() {
        let rules = RuleSet::default();
        for input in ["a bottle of water", "élan and poise", "4-pack OF cups", "x"] {
            let cased = to_title_case(input, &rules);
            assert!(is_title_case(&cased, &rules), "not title case: {cased}");
            assert_eq!(to_title_case(&cased, &rules), cased);
        }
    }

    #[test]
    fn test_length_preserved_for_multi_char_mappings() {
        let rules = RuleSet::default();
        assert_eq!(to_title_case("ßtraße", &rules), "ßtraße");
    }
}

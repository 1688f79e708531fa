//! Listing auto-fixer
//!
//! Rewrites each listing field independently so that the rules the fixer
//! targets no longer fire. Fixing is total and idempotent: a fixed listing
//! passes through a second fix unchanged.

use crate::casing::{capitalize_in_place, is_all_caps, to_title_case};
use crate::patterns::strip_markup;
use crate::validator::ComplianceValidator;
use listforge_core::text::{collapse_whitespace, normalize_paragraphs, truncate_with_ellipsis};
use listforge_core::Listing;

const BULLET_TRAILING: &[char] = &['.', '!', '?', ',', ';', ':'];

/// Title used when neither the title nor the category survives fixing
pub const FALLBACK_TITLE: &str = "Product";

impl ComplianceValidator {
    /// Return a fixed copy of the listing
    pub fn auto_fix(&self, listing: &Listing) -> Listing {
        let fixed = Listing {
            category: listing.category.clone(),
            title: self.fix_listing_title(&listing.title, &listing.category),
            bullets: listing.bullets.iter().map(|b| self.fix_bullet(b)).collect(),
            description: self.fix_description(&listing.description),
            search_terms: self.fix_search_terms(&listing.search_terms),
            attributes: listing.attributes.clone(),
        };

        tracing::debug!(
            title_changed = fixed.title != listing.title,
            search_terms_before = listing.search_terms.len(),
            search_terms_after = fixed.search_terms.len(),
            "Auto-fixed listing"
        );
        fixed
    }

    /// Fix the title, falling back to the category name and then
    /// [`FALLBACK_TITLE`] when the fixed title is empty or all capitals
    pub fn fix_listing_title(&self, title: &str, category: &str) -> String {
        let fixed = self.fix_title(title);
        if self.is_usable_title(&fixed) {
            return fixed;
        }

        let fallback = [category, FALLBACK_TITLE]
            .into_iter()
            .map(|candidate| self.fix_title(candidate))
            .find(|candidate| self.is_usable_title(candidate));
        match fallback {
            Some(candidate) => {
                tracing::debug!(title = %title, fallback = %candidate, "Replaced unusable title");
                candidate
            }
            None => fixed,
        }
    }

    fn is_usable_title(&self, title: &str) -> bool {
        !title.trim().is_empty() && !is_all_caps(title)
    }

    pub fn fix_title(&self, title: &str) -> String {
        let without_chars: String = title
            .chars()
            .filter(|c| !self.rules.is_forbidden_title_char(*c))
            .collect();
        let stripped = collapse_whitespace(&self.banned.strip(&without_chars));
        let truncated = truncate_with_ellipsis(&stripped, self.rules.limits.title_max_chars);
        // A cut word can end in a banned fragment ("topsoil" -> "top...")
        let truncated = collapse_whitespace(&self.banned.strip(&truncated));
        to_title_case(&truncated, &self.rules)
    }

    pub fn fix_bullet(&self, bullet: &str) -> String {
        let stripped = collapse_whitespace(&self.banned.strip(bullet));
        let truncated = truncate_with_ellipsis(&stripped, self.rules.limits.bullet_max_chars);
        let truncated = collapse_whitespace(&self.banned.strip(&truncated));
        let trimmed = truncated.trim_end_matches(|c: char| BULLET_TRAILING.contains(&c) || c.is_whitespace());
        capitalize_in_place(trimmed)
    }

    pub fn fix_description(&self, description: &str) -> String {
        let without_markup = strip_markup(description);
        let stripped = normalize_paragraphs(&self.banned.strip(&without_markup));
        let truncated = truncate_with_ellipsis(&stripped, self.rules.limits.description_max_chars);
        normalize_paragraphs(&self.banned.strip(&truncated))
    }

    /// Lowercase, drop banned and duplicate terms, then trim from the end to
    /// the byte budget and the term cap
    pub fn fix_search_terms(&self, terms: &[String]) -> Vec<String> {
        let limits = &self.rules.limits;
        let mut seen = std::collections::HashSet::new();
        let mut fixed: Vec<String> = terms
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty() && !self.banned.is_match(t))
            .filter(|t| seen.insert(t.clone()))
            .collect();

        while !fixed.is_empty() && fixed.join(" ").len() > limits.search_terms_max_bytes {
            fixed.pop();
        }
        fixed.truncate(limits.max_search_terms);
        fixed
    }

    /// Inline cleanup used while generating single-line fields: strip banned
    /// phrases, collapse whitespace, capitalize, and truncate
    pub fn sanitize_line(&self, text: &str, max_chars: usize) -> String {
        let stripped = collapse_whitespace(&self.banned.strip(text));
        truncate_with_ellipsis(&capitalize_in_place(&stripped), max_chars)
    }

    /// Inline cleanup for multi-paragraph text, keeping blank-line breaks
    pub fn sanitize_paragraphs(&self, text: &str, max_chars: usize) -> String {
        let stripped = normalize_paragraphs(&self.banned.strip(text));
        normalize_paragraphs(&truncate_with_ellipsis(&capitalize_in_place(&stripped), max_chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;
    use proptest::prelude::*;

    fn validator() -> ComplianceValidator {
        ComplianceValidator::new(RuleSet::default()).unwrap()
    }

    #[test]
    fn test_fix_title() {
        let v = validator();
        assert_eq!(
            v.fix_title("BEST   WATER BOTTLE!! FOR THE GYM"),
            "Water Bottle for the Gym"
        );
        assert_eq!(v.fix_title("steel bottle #1 with lid"), "Steel Bottle 1 with Lid");
    }

    #[test]
    fn test_fix_title_truncates() {
        let v = validator();
        let fixed = v.fix_title(&"bottle ".repeat(50));
        assert_eq!(fixed.chars().count(), 200);
        assert!(fixed.ends_with("..."));
    }

    #[test]
    fn test_unusable_title_falls_back_to_category() {
        let v = validator();
        let listing = Listing {
            category: "water bottle".to_string(),
            title: "Best Sale".to_string(),
            ..Default::default()
        };

        let before = v.validate(&listing);
        let fixed = v.auto_fix(&listing);
        let after = v.validate(&fixed);

        assert_eq!(fixed.title, "Water Bottle");
        assert!(!after.errors.contains(&"Title is missing".to_string()));
        assert!(after.errors.iter().all(|e| before.errors.contains(e)), "new errors: {:?}", after.errors);
        assert_eq!(v.auto_fix(&fixed), fixed);
    }

    #[test]
    fn test_unusable_title_without_category_uses_fallback() {
        let v = validator();
        assert_eq!(v.fix_listing_title("!!!", ""), FALLBACK_TITLE);
        assert_eq!(v.fix_listing_title("!!!", "best"), FALLBACK_TITLE);

        // "a" title-cases to "A", which reads as all capitals
        assert_eq!(v.fix_title("a"), "A");
        assert_eq!(v.fix_listing_title("a", "Yoga Mat"), "Yoga Mat");
        assert_eq!(v.fix_listing_title("steel bottle", "Yoga Mat"), "Steel Bottle");
    }

    #[test]
    fn test_fix_title_strips_fragment_left_by_truncation() {
        let v = validator();
        let title = format!("{}topsoil", "a".repeat(194));
        let fixed = v.fix_title(&title);

        assert!(!v.banned().is_match(&fixed), "got {fixed:?}");
        assert_eq!(v.fix_title(&fixed), fixed);
    }

    #[test]
    fn test_fix_bullet() {
        let v = validator();
        assert_eq!(
            v.fix_bullet("  the best   lid you will find!!! "),
            "The lid you will find"
        );
        assert_eq!(v.fix_bullet("keeps cold;"), "Keeps cold");

        let long = v.fix_bullet(&"word ".repeat(80));
        assert!(long.chars().count() <= 256);
        assert!(!long.ends_with('.'));
    }

    #[test]
    fn test_fix_description() {
        let v = validator();
        let fixed = v.fix_description(
            "<p>A great   bottle.</p>\n\nVisit https://example.com for the best deals.\n\n\n",
        );
        assert_eq!(fixed, "A great bottle.\n\nVisit for the deals.");
    }

    #[test]
    fn test_fix_search_terms_byte_budget() {
        let v = validator();
        let terms: Vec<String> = (0..60).map(|i| format!("keyword{i:02}")).collect();
        assert!(terms.join(" ").len() > 400);

        let fixed = v.fix_search_terms(&terms);
        assert!(fixed.join(" ").len() <= 249, "got {} bytes", fixed.join(" ").len());
        assert_eq!(fixed[0], "keyword00");
        assert!(fixed.len() <= 50);
    }

    #[test]
    fn test_fix_search_terms_drops_banned_and_duplicates() {
        let v = validator();
        let terms: Vec<String> = ["Bottle", "bottle ", "cheap bottle", "", "Steel"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(v.fix_search_terms(&terms), vec!["bottle", "steel"]);
    }

    #[test]
    fn test_fix_search_terms_may_empty() {
        let v = validator();
        let terms = vec!["x".repeat(300)];
        assert!(v.fix_search_terms(&terms).is_empty());
    }

    #[test]
    fn test_auto_fix_clears_targeted_errors() {
        let v = validator();
        let listing = Listing {
            title: "BEST STEEL BOTTLE!!".to_string(),
            bullets: vec![
                "keeps drinks cold.".to_string(),
                "the cheapest lid around!".to_string(),
                "Fits cup holders in most cars".to_string(),
            ],
            description: "<b>Steel</b> bottle, see https://example.com".to_string(),
            search_terms: (0..60).map(|i| format!("term{i:02}")).collect(),
            ..Default::default()
        };

        let before = v.validate(&listing);
        let fixed = v.auto_fix(&listing);
        let after = v.validate(&fixed);

        assert!(after.errors.iter().all(|e| before.errors.contains(e)), "new errors: {:?}", after.errors);
        assert!(after.errors.len() < before.errors.len());
        assert!(after.compliance_score >= before.compliance_score);
    }

    fn category() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["", "Water Bottle", "best sale", "a", "yoga mat", "!!!"])
            .prop_map(str::to_string)
    }

    fn phrase() -> impl Strategy<Value = String> {
        let words = prop::sample::select(vec![
            "bottle", "Steel", "BEST", "with", "lid", "the", "free shipping", "#1", "cold!",
            "<b>", "https://x.io", "  ", "Travel", "of", "ÉLAN", "cup;", "top rated", "Limited",
            "a", "Sale", "!!!", "topsoil", "free", "shipping", "x",
        ]);
        prop::collection::vec(words, 0..24).prop_map(|w| w.join(" "))
    }

    proptest! {
        /// Property: fixing a fixed listing changes nothing
        #[test]
        fn auto_fix_is_idempotent(
            category in category(),
            title in phrase(),
            bullets in prop::collection::vec(phrase(), 0..6),
            description in phrase(),
            terms in prop::collection::vec(phrase(), 0..60),
        ) {
            let v = validator();
            let listing = Listing { category, title, bullets, description, search_terms: terms, ..Default::default() };

            let once = v.auto_fix(&listing);
            let twice = v.auto_fix(&once);
            prop_assert_eq!(once, twice);
        }

        /// Property: every error left after fixing was already reported
        #[test]
        fn auto_fix_never_adds_errors(
            category in category(),
            title in phrase(),
            bullets in prop::collection::vec(phrase(), 0..6),
            description in phrase(),
            terms in prop::collection::vec(phrase(), 0..60),
        ) {
            let v = validator();
            let listing = Listing { category, title, bullets, description, search_terms: terms, ..Default::default() };

            let before = v.validate(&listing);
            let after = v.validate(&v.auto_fix(&listing));
            for error in &after.errors {
                prop_assert!(before.errors.contains(error), "new error {:?}, before {:?}", error, before.errors);
            }
        }

        /// Property: fixed search terms always fit the byte budget
        #[test]
        fn fixed_search_terms_fit_budget(terms in prop::collection::vec("\\PC{0,40}", 0..80)) {
            let fixed = validator().fix_search_terms(&terms);
            prop_assert!(fixed.join(" ").len() <= 249);
            prop_assert!(fixed.len() <= 50);
        }
    }
}

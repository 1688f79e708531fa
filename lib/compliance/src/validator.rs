//! Listing validator
//!
//! Checks a listing against the rule set and reports errors, warnings and
//! suggestions. Validation is pure and never fails; a degenerate listing
//! simply collects more findings.

use crate::casing::{is_all_caps, is_title_case};
use crate::patterns::{contains_html, contains_url, PhraseMatcher};
use crate::rules::RuleSet;
use listforge_core::text::char_len;
use listforge_core::{Listing, Result};
use serde::{Deserialize, Serialize};

/// Score deducted per error
pub const ERROR_PENALTY: u32 = 10;

/// Score deducted per warning
pub const WARNING_PENALTY: u32 = 3;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    /// `max(0, 100 - 10 * errors - 3 * warnings)`
    pub compliance_score: u32,
}

impl ValidationResult {
    /// Compute validity and score from the collected findings
    fn finish(mut self) -> Self {
        self.is_valid = self.errors.is_empty();
        self.compliance_score = compliance_score(self.errors.len(), self.warnings.len());
        self
    }
}

pub fn compliance_score(errors: usize, warnings: usize) -> u32 {
    let deduction = (errors as u64) * ERROR_PENALTY as u64 + (warnings as u64) * WARNING_PENALTY as u64;
    100u64.saturating_sub(deduction) as u32
}

/// Rule-set driven validator and auto-fixer
#[derive(Debug, Clone)]
pub struct ComplianceValidator {
    pub(crate) rules: RuleSet,
    pub(crate) banned: PhraseMatcher,
    pub(crate) promotional: PhraseMatcher,
}

impl ComplianceValidator {
    pub fn new(rules: RuleSet) -> Result<Self> {
        let banned = PhraseMatcher::new(&rules.banned_phrases)?;
        let promotional = PhraseMatcher::new(&rules.promotional_phrases)?;
        Ok(Self {
            rules,
            banned,
            promotional,
        })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Matcher for the banned phrase list
    pub fn banned(&self) -> &PhraseMatcher {
        &self.banned
    }

    pub fn validate(&self, listing: &Listing) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.check_title(&listing.title, &mut result);
        self.check_bullets(&listing.bullets, &mut result);
        self.check_description(&listing.description, &mut result);
        self.check_search_terms(&listing.search_terms, &mut result);
        self.check_attributes(listing, &mut result);
        self.check_language(listing, &mut result);

        let result = result.finish();
        tracing::debug!(
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            score = result.compliance_score,
            "Validated listing"
        );
        result
    }

    fn check_title(&self, title: &str, result: &mut ValidationResult) {
        let limits = &self.rules.limits;
        if title.trim().is_empty() {
            result.errors.push("Title is missing".to_string());
            return;
        }

        let length = char_len(title);
        if length > limits.title_max_chars {
            result
                .errors
                .push(format!("Title exceeds {} characters", limits.title_max_chars));
        } else if length < limits.title_min_chars {
            result.warnings.push(format!(
                "Title is shorter than recommended {} characters",
                limits.title_min_chars
            ));
        }

        if is_all_caps(title) {
            result
                .errors
                .push("Title should not be in all capital letters".to_string());
        }

        for &c in &self.rules.forbidden_title_chars {
            if title.contains(c) {
                result
                    .errors
                    .push(format!("Title contains prohibited character: {c}"));
            }
        }

        if !is_title_case(title, &self.rules) {
            result
                .warnings
                .push("Title should use proper title case capitalization".to_string());
        }
    }

    fn check_bullets(&self, bullets: &[String], result: &mut ValidationResult) {
        let limits = &self.rules.limits;
        if bullets.is_empty() {
            result.errors.push("Bullet points are missing".to_string());
            return;
        }

        if bullets.len() < limits.min_bullets {
            result.errors.push(format!(
                "Minimum {} bullet points required",
                limits.min_bullets
            ));
        } else if bullets.len() > limits.max_bullets {
            result.warnings.push(format!(
                "Maximum {} bullet points recommended",
                limits.max_bullets
            ));
        }

        for (i, bullet) in bullets.iter().enumerate() {
            let n = i + 1;
            let length = char_len(bullet);
            if length > limits.bullet_max_chars {
                result.errors.push(format!(
                    "Bullet {n} exceeds {} characters",
                    limits.bullet_max_chars
                ));
            } else if length < limits.bullet_min_chars {
                result.warnings.push(format!(
                    "Bullet {n} is too short (min {} chars)",
                    limits.bullet_min_chars
                ));
            }

            if bullet.chars().next().is_some_and(|c| !c.is_uppercase()) {
                result
                    .warnings
                    .push(format!("Bullet {n} should start with a capital letter"));
            }

            if bullet.ends_with(['.', '!', '?']) {
                result
                    .warnings
                    .push(format!("Bullet {n} should not end with punctuation"));
            }
        }
    }

    fn check_description(&self, description: &str, result: &mut ValidationResult) {
        let limits = &self.rules.limits;
        if description.trim().is_empty() {
            result.warnings.push("Description is missing".to_string());
            return;
        }

        let length = char_len(description);
        if length > limits.description_max_chars {
            result.errors.push(format!(
                "Description exceeds {} characters",
                limits.description_max_chars
            ));
        } else if length < limits.description_min_chars {
            result.warnings.push(format!(
                "Description is shorter than recommended {} characters",
                limits.description_min_chars
            ));
        }

        if contains_html(description) {
            result.errors.push("Description contains HTML tags".to_string());
        }
        if contains_url(description) {
            result.errors.push("Description contains URLs".to_string());
        }
    }

    fn check_search_terms(&self, terms: &[String], result: &mut ValidationResult) {
        let limits = &self.rules.limits;
        if terms.is_empty() {
            result.warnings.push("Search terms are missing".to_string());
            return;
        }

        if terms.join(" ").len() > limits.search_terms_max_bytes {
            result.errors.push(format!(
                "Search terms exceed {} bytes",
                limits.search_terms_max_bytes
            ));
        }

        let mut seen = std::collections::HashSet::with_capacity(terms.len());
        if !terms.iter().all(|t| seen.insert(t.trim().to_lowercase())) {
            result
                .warnings
                .push("Search terms contain duplicates".to_string());
        }

        if terms.len() > limits.max_search_terms {
            result.warnings.push(format!(
                "Too many search terms (max {})",
                limits.max_search_terms
            ));
        }
    }

    fn check_attributes(&self, listing: &Listing, result: &mut ValidationResult) {
        for attribute in &self.rules.recommended_attributes {
            if !listing.attributes.has_value(attribute) {
                result
                    .suggestions
                    .push(format!("Consider adding '{attribute}' attribute"));
            }
        }
    }

    /// Scan every field for banned and promotional phrases
    ///
    /// Fields and search terms are separated by line breaks, so a phrase
    /// only matches inside one field.
    fn check_language(&self, listing: &Listing, result: &mut ValidationResult) {
        let corpus = std::iter::once(&listing.title)
            .chain(std::iter::once(&listing.description))
            .chain(&listing.bullets)
            .chain(&listing.search_terms)
            .map(|field| field.to_lowercase())
            .collect::<Vec<_>>()
            .join("\n");

        let banned = self.banned.find_all(&corpus);
        if !banned.is_empty() {
            result.errors.push(format!(
                "Contains banned words/phrases: {}",
                banned.join(", ")
            ));
        }

        let promotional = self.promotional.find_all(&corpus);
        if !promotional.is_empty() {
            result.warnings.push(format!(
                "Contains promotional language: {}",
                promotional.join(", ")
            ));
        }
    }
}

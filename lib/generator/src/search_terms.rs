//! Search term assembly

use crate::extract::ExtractedAttributes;
use listforge_compliance::ComplianceValidator;
use listforge_core::text::{char_len, dedupe_case_insensitive};
use listforge_schema::CategorySchema;

/// Union of schema keywords, fused keywords, colors and materials
///
/// Terms are lowercased; terms of two characters or fewer and terms that
/// contain a banned phrase are dropped. The byte budget is left to the
/// compliance fixer.
pub fn build_search_terms(
    schema: &CategorySchema,
    extracted: &ExtractedAttributes,
    keywords: &[String],
    keyword_limit: usize,
    validator: &ComplianceValidator,
) -> Vec<String> {
    let candidates = schema
        .keywords
        .iter()
        .map(String::as_str)
        .chain(keywords.iter().take(keyword_limit).map(String::as_str))
        .chain(extracted.list("colors"))
        .chain(extracted.list("materials"))
        .map(|term| term.trim().to_lowercase())
        .filter(|term| char_len(term) > 2 && !validator.banned().is_match(term));

    let mut terms = dedupe_case_insensitive(candidates);
    terms.truncate(validator.rules().limits.max_search_terms);
    terms
}

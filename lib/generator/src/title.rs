//! Title assembly

use crate::extract::ExtractedAttributes;
use crate::generator::GeneratorConfig;
use listforge_compliance::casing::to_title_case;
use listforge_compliance::ComplianceValidator;
use listforge_core::text::dedupe_case_insensitive;
use listforge_core::AttributeValue;
use listforge_schema::CategorySchema;

/// Keys that can carry the capacity spec, in precedence order
const CAPACITY_KEYS: &[&str] = &["capacity", "capacity_ml", "size", "volume"];

pub(crate) fn capacity(extracted: &ExtractedAttributes) -> Option<String> {
    CAPACITY_KEYS.iter().find_map(|key| {
        let value = extracted.present(key)?;
        match (*key, value) {
            ("capacity_ml", AttributeValue::Number(_)) => Some(format!("{value}ml")),
            ("capacity_ml", AttributeValue::Text(s)) if s.trim().chars().all(|c| c.is_ascii_digit()) => {
                Some(format!("{}ml", s.trim()))
            }
            (_, AttributeValue::Bool(_)) => None,
            (_, AttributeValue::Number(_)) => Some(value.to_string()),
            _ => extracted.present_text(key).map(str::to_string),
        }
    })
}

/// Build the title: brand, category, key specs and qualifiers, title-cased
/// and passed through the inline compliance cleanup
pub fn build_title(
    schema: &CategorySchema,
    extracted: &ExtractedAttributes,
    config: &GeneratorConfig,
    validator: &ComplianceValidator,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(brand) = extracted.present_text("brand").filter(|b| !config.is_placeholder(b)) {
        parts.push(brand.to_string());
    }
    parts.push(schema.display_name().to_string());

    if let Some(capacity) = capacity(extracted) {
        parts.push(capacity);
    }
    for key in ["color", "material"] {
        if let Some(value) = extracted.present_text(key).filter(|v| !config.is_placeholder(v)) {
            parts.push(value.to_string());
        }
    }

    if extracted.flag("is_professional") {
        parts.push("Professional Grade".to_string());
    }
    let wireless = extracted
        .attributes
        .iter()
        .any(|(_, value)| value.mentions("wireless") || value.mentions("bluetooth"));
    if wireless {
        parts.push("Wireless".to_string());
    }

    let parts = dedupe_case_insensitive(&parts);
    let rules = validator.rules();
    let title = to_title_case(&parts.join(" "), rules);
    validator.sanitize_line(&title, rules.limits.title_max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use listforge_compliance::RuleSet;
    use listforge_core::Attributes;

    fn validator() -> ComplianceValidator {
        ComplianceValidator::new(RuleSet::default()).unwrap()
    }

    fn extracted(pairs: &[(&str, AttributeValue)]) -> ExtractedAttributes {
        ExtractedAttributes {
            attributes: pairs.iter().cloned().collect::<Attributes>(),
            defaulted: Default::default(),
        }
    }

    fn schema() -> CategorySchema {
        CategorySchema::new("water_bottle", "Water Bottle")
    }

    #[test]
    fn test_full_title() {
        let attrs = extracted(&[
            ("brand", "HydroPeak".into()),
            ("capacity_ml", AttributeValue::Number(750.0)),
            ("color", "navy blue".into()),
            ("material", "stainless steel".into()),
            ("is_professional", true.into()),
        ]);
        let title = build_title(&schema(), &attrs, &GeneratorConfig::default(), &validator());
        assert_eq!(
            title,
            "HydroPeak Water Bottle 750ml Navy Blue Stainless Steel Professional Grade"
        );
    }

    #[test]
    fn test_placeholder_and_defaulted_brand_skipped() {
        let mut attrs = extracted(&[("brand", "Generic".into())]);
        let title = build_title(&schema(), &attrs, &GeneratorConfig::default(), &validator());
        assert_eq!(title, "Water Bottle");

        attrs.attributes.insert("brand", "Acme");
        attrs.defaulted.insert("brand".to_string());
        let title = build_title(&schema(), &attrs, &GeneratorConfig::default(), &validator());
        assert_eq!(title, "Water Bottle");
    }

    #[test]
    fn test_wireless_and_duplicates() {
        let attrs = extracted(&[
            ("color", "water".into()),
            ("tech_keywords", AttributeValue::List(vec!["bluetooth".to_string()])),
        ]);
        let schema = CategorySchema::new("headphones", "Headphones");
        let title = build_title(&schema, &attrs, &GeneratorConfig::default(), &validator());
        assert_eq!(title, "Headphones Water Wireless");

        let attrs = extracted(&[("color", "Water Bottle".into())]);
        let title = build_title(&self::schema(), &attrs, &GeneratorConfig::default(), &validator());
        assert_eq!(title, "Water Bottle");
    }

    #[test]
    fn test_banned_words_removed() {
        let attrs = extracted(&[("brand", "Best Bottles".into())]);
        let title = build_title(&schema(), &attrs, &GeneratorConfig::default(), &validator());
        assert_eq!(title, "Bottles Water Bottle");
    }
}

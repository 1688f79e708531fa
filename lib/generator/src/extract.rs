//! Attribute extraction
//!
//! Turns fused features into the attribute map a listing is written from:
//! pattern matches, keyword buckets, colors and materials, image-derived
//! surface details, and defaults for schema-required fields.

use crate::fusion::FusedFeatures;
use crate::generator::GeneratorConfig;
use listforge_core::text::{dedupe_case_insensitive, words};
use listforge_core::{AttributeValue, Attributes, PostFeatures};
use listforge_schema::{CategorySchema, FieldType};
use std::collections::BTreeSet;

pub const MATERIAL_WORDS: &[&str] = &[
    "steel", "stainless", "aluminum", "aluminium", "plastic", "glass", "wood", "wooden", "bamboo",
    "cotton", "polyester", "leather", "silicone", "rubber", "ceramic", "metal", "nylon", "wool",
    "titanium", "cork", "linen", "canvas", "copper", "foam",
];

pub const AUDIENCE_WORDS: &[&str] = &[
    "professional", "professionals", "pro", "beginner", "beginners", "kids", "children", "women",
    "men", "athletes", "runners", "travelers", "students", "family", "chefs",
];

pub const USAGE_WORDS: &[&str] = &[
    "gym", "travel", "hiking", "camping", "office", "home", "kitchen", "outdoor", "outdoors",
    "yoga", "running", "cycling", "school", "work", "commute", "fitness", "workout", "sports",
    "beach", "gaming", "studio",
];

pub const TECH_WORDS: &[&str] = &[
    "wireless", "bluetooth", "usb", "usb-c", "wifi", "wi-fi", "noise", "cancelling", "battery",
    "rechargeable", "smart", "app", "charging",
];

pub const FEATURE_WORDS: &[&str] = &[
    "insulated", "leakproof", "leak-proof", "waterproof", "lightweight", "portable", "foldable",
    "adjustable", "durable", "reusable", "ergonomic", "non-slip", "bpa-free", "dishwasher-safe",
    "eco-friendly", "compact", "washable", "breathable", "recyclable", "sustainable", "organic",
    "cushioned", "padded",
];

pub const COLOR_WORDS: &[&str] = &[
    "black", "white", "red", "blue", "green", "yellow", "orange", "purple", "pink", "brown",
    "gray", "grey", "silver", "gold", "beige", "navy", "teal", "charcoal", "ivory",
];

const PROFESSIONAL_SIGNALS: &[&str] = &["professional", "professionals", "pro"];

/// Connectivity labels in precedence order
const CONNECTIVITY: &[(&str, &str)] = &[
    ("bluetooth", "Bluetooth"),
    ("wireless", "Wireless"),
    ("wi-fi", "Wi-Fi"),
    ("wifi", "Wi-Fi"),
    ("usb-c", "USB-C"),
    ("usb", "USB"),
];

/// Extracted attributes plus the keys that were filled by defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedAttributes {
    pub attributes: Attributes,
    pub defaulted: BTreeSet<String>,
}

impl ExtractedAttributes {
    #[inline]
    pub fn is_defaulted(&self, key: &str) -> bool {
        self.defaulted.contains(key)
    }

    /// A value that came from the post, never from a default
    pub fn present(&self, key: &str) -> Option<&AttributeValue> {
        if self.is_defaulted(key) {
            return None;
        }
        self.attributes.get(key).filter(|v| !v.is_empty())
    }

    /// Primary text of a present value
    pub fn present_text(&self, key: &str) -> Option<&str> {
        if self.is_defaulted(key) {
            return None;
        }
        self.attributes.primary(key)
    }

    pub fn list(&self, key: &str) -> Vec<&str> {
        self.attributes.list(key)
    }

    pub fn flag(&self, key: &str) -> bool {
        !self.is_defaulted(key) && self.attributes.flag(key)
    }
}

/// Collect bucket members from the token stream, in first-seen order
fn bucket(tokens: &[String], vocabulary: &[&str]) -> Vec<String> {
    dedupe_case_insensitive(tokens.iter().filter(|t| vocabulary.contains(&t.as_str())))
}

fn insert_list(attributes: &mut Attributes, key: &str, values: Vec<String>) {
    if !values.is_empty() {
        attributes.insert(key, values);
    }
}

pub fn extract_attributes(
    schema: &CategorySchema,
    post: &PostFeatures,
    fused: &FusedFeatures,
    config: &GeneratorConfig,
) -> ExtractedAttributes {
    let text = &post.text;
    let mut attributes = fused.attributes.clone();

    for (kind, values) in &text.pattern_matches {
        let values = dedupe_case_insensitive(values);
        match values.len() {
            0 => {}
            1 => attributes.insert(kind.as_str(), values[0].clone()),
            _ => {
                attributes.insert(format!("{kind}_primary"), values[0].clone());
                attributes.insert(kind.as_str(), values);
            }
        }
    }

    let tokens: Vec<String> = text
        .keywords
        .iter()
        .chain(fused.all_keywords.iter())
        .flat_map(|k| words(k))
        .chain(words(text.text()))
        .collect();

    let materials_found = bucket(&tokens, MATERIAL_WORDS);
    let audience = bucket(&tokens, AUDIENCE_WORDS);
    let usage = bucket(&tokens, USAGE_WORDS);
    let tech = bucket(&tokens, TECH_WORDS);
    let features = bucket(&tokens, FEATURE_WORDS);

    insert_list(&mut attributes, "material_keywords", materials_found.clone());
    insert_list(&mut attributes, "audience_keywords", audience.clone());
    insert_list(&mut attributes, "usage_keywords", usage);
    insert_list(&mut attributes, "tech_keywords", tech.clone());
    insert_list(&mut attributes, "feature_keywords", features);

    // Colors: text patterns, fused color, image palettes, then color words
    let pattern_colors = text.pattern_matches.get("color").cloned().unwrap_or_default();
    let colors = dedupe_case_insensitive(
        pattern_colors
            .iter()
            .map(String::as_str)
            .chain(fused.attributes.primary("color"))
            .chain(post.images.iter().flat_map(|i| i.dominant_colors.iter().map(String::as_str)))
            .chain(bucket(&tokens, COLOR_WORDS).iter().map(String::as_str)),
    );
    if let Some(first) = colors.first() {
        if !attributes.has_value("color") {
            attributes.insert("color", first.clone());
        }
    }
    insert_list(&mut attributes, "colors", colors);

    let pattern_materials = text.pattern_matches.get("material").cloned().unwrap_or_default();
    let materials = dedupe_case_insensitive(
        pattern_materials
            .iter()
            .chain(materials_found.iter())
            .chain(post.images.iter().flat_map(|i| i.inferred_materials.iter())),
    );
    if let Some(first) = materials.first() {
        if !attributes.has_value("material") {
            attributes.insert("material", first.clone());
        }
    }
    insert_list(&mut attributes, "materials", materials);

    // Surface details from the first image that reports them
    if let Some(texture) = post.images.iter().find_map(|i| i.texture.texture_type.clone()) {
        attributes.insert_if_absent("texture", texture);
    }
    if let Some(finish) = post.images.iter().find_map(|i| i.texture.surface_appearance.clone()) {
        attributes.insert_if_absent("finish", finish);
    }
    insert_list(
        &mut attributes,
        "patterns",
        dedupe_case_insensitive(post.images.iter().flat_map(|i| i.texture.patterns.iter())),
    );
    if let Some(mood) = post.images.iter().find_map(|i| i.color_mood.clone()) {
        attributes.insert_if_absent("color_mood", mood);
    }
    if let Some(tier) = post.images.iter().filter_map(|i| i.quality_metrics.quality_tier).max() {
        attributes.insert_if_absent("quality_tier", tier.as_str());
    }

    if let Some((_, label)) = CONNECTIVITY
        .iter()
        .find(|(word, _)| tech.iter().any(|t| t == word))
    {
        attributes.insert_if_absent("connectivity", *label);
    }
    if tech.iter().any(|t| t == "rechargeable") {
        attributes.insert_if_absent("battery", "Rechargeable");
    } else if tech.iter().any(|t| t == "battery") {
        attributes.insert_if_absent("battery", "Battery powered");
    }

    if audience.iter().any(|a| PROFESSIONAL_SIGNALS.contains(&a.as_str())) {
        attributes.insert("is_professional", true);
    }

    if !attributes.has_value("brand") {
        if let Some(org) = text
            .entities
            .iter()
            .find(|e| e.label == "ORG" && e.score > config.brand_min_score)
        {
            attributes.insert("brand", org.text.trim());
        }
    }

    let mut defaulted = BTreeSet::new();
    for (name, spec) in &schema.required_fields {
        if attributes.has_value(name) {
            continue;
        }
        let value = match spec.field_type {
            FieldType::Text => AttributeValue::Text(config.text_default.clone()),
            FieldType::Numeric => AttributeValue::Number(spec.min.unwrap_or(0.0)),
            FieldType::Boolean => AttributeValue::Bool(false),
        };
        tracing::debug!(field = %name, value = %value, "Defaulted required field");
        attributes.insert(name.as_str(), value);
        defaulted.insert(name.clone());
    }

    ExtractedAttributes { attributes, defaulted }
}

//! Description template
//!
//! One fixed four-paragraph template. Only the brand and the category name
//! are substituted; product attributes are left to the title and bullets.

use listforge_compliance::ComplianceValidator;
use listforge_schema::CategorySchema;

/// Write the description; `brand` is omitted when `None`
pub fn build_description(schema: &CategorySchema, brand: Option<&str>, validator: &ComplianceValidator) -> String {
    let name = schema.display_name();
    let lower = name.to_lowercase();

    let intro = match brand {
        Some(brand) => format!("Introducing the {brand} {name}, a thoughtful blend of function and style."),
        None => format!("Introducing the {name}, a thoughtful blend of function and style."),
    };

    let paragraphs = [
        intro,
        format!(
            "This {lower} pairs solid build quality with a considered design that fits your daily needs. \
             Crafted with attention to detail, it offers reliable performance and durability you can count on."
        ),
        format!(
            "Whether you are a professional or a casual user, this {lower} delivers the quality and features \
             you are looking for. Its versatile design suits a wide range of occasions and uses."
        ),
        format!(
            "Key features include sturdy construction, a user-friendly design, versatile functionality, \
             long-lasting durability and modern looks. Experience the difference with a carefully designed \
             {lower} that combines practicality with style."
        ),
    ];

    validator.sanitize_paragraphs(&paragraphs.join("\n\n"), validator.rules().limits.description_max_chars)
}

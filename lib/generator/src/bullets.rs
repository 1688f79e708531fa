//! Bullet synthesis
//!
//! Bullets are written by twelve aspect generators visited in a shuffled
//! order. A candidate is kept only when it shares little vocabulary with
//! the bullets already accepted, so the final list reads as distinct
//! points rather than rephrasings.
//!
//! ```text
//!   context ──► richness ──► target (3..=5)
//!      │
//!      ▼
//!   shuffle(aspects, rng) ──► render ──► sanitize ──► unique? ──► accept
//!                                                        │
//!                                   fewer than 3 ──► fillers (in order)
//! ```

use crate::extract::ExtractedAttributes;
use crate::generator::GeneratorConfig;
use crate::title::capacity;
use ahash::AHashSet;
use listforge_compliance::{ComplianceValidator, PhraseMatcher};
use listforge_core::text::{char_len, join_natural, words};
use rand::seq::SliceRandom;
use rand::Rng;

/// Words ignored when comparing bullets
pub const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "for", "to", "of", "with", "in", "on", "at", "by", "as", "from",
    "your", "you", "it", "its", "is", "are", "be", "this", "that", "so", "any", "all", "can",
];

/// Verbs too generic to mark a keyword as used
const FILLER_VERBS: &[&str] = &[
    "makes", "keeps", "helps", "stands", "feels", "pairs", "adds", "resists", "delivers",
    "matches", "meets", "arrives", "combines",
];

/// Generic bullets tried in order when the aspects produce fewer than three
pub const FILLER_BULLETS: &[&str] = &[
    "Thoughtfully crafted to fit seamlessly into daily life at home or on the move",
    "Versatile everyday essential that suits routines of all kinds",
    "Makes a welcome gift for friends, family and colleagues on any occasion",
    "Carefully inspected before shipping so it arrives ready to enjoy",
];

/// Share of the smaller bullet's words two bullets may have in common
pub const MAX_OVERLAP: f32 = 0.3;

const SAFETY_FEATURES: &[&str] = &["bpa-free", "non-slip", "food-safe", "non-toxic"];
const SAFE_MATERIALS: &[&str] = &["stainless", "steel", "glass", "silicone", "ceramic"];
const ECO_FEATURES: &[&str] = &["reusable", "eco-friendly", "recyclable", "sustainable", "organic"];
const ECO_MATERIALS: &[&str] = &["bamboo", "cork", "cotton", "wool", "linen"];
const COMFORT_FEATURES: &[&str] = &["ergonomic", "cushioned", "padded", "non-slip", "lightweight", "breathable"];
const CONVENIENCE_FEATURES: &[&str] = &[
    "portable", "lightweight", "foldable", "compact", "dishwasher-safe", "washable",
];

/// What the bullet writers know about the product
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulletContext {
    pub brand: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub finish: Option<String>,
    pub capacity: Option<String>,
    pub connectivity: Option<String>,
    pub battery: Option<String>,
    pub audience: Vec<String>,
    pub usage: Vec<String>,
    pub features: Vec<String>,
    pub professional: bool,
    pub high_quality: bool,
    pub has_image_descriptions: bool,
    pub keywords: Vec<String>,
}

impl BulletContext {
    pub fn from_extracted(
        extracted: &ExtractedAttributes,
        keywords: &[String],
        config: &GeneratorConfig,
    ) -> Self {
        let real = |key: &str| {
            extracted
                .present_text(key)
                .filter(|v| !config.is_placeholder(v))
                .map(str::to_string)
        };
        let owned = |key: &str| -> Vec<String> {
            extracted.list(key).into_iter().map(str::to_string).collect()
        };

        Self {
            brand: real("brand"),
            material: real("material"),
            color: real("color"),
            finish: real("finish"),
            capacity: capacity(extracted),
            connectivity: real("connectivity"),
            battery: real("battery"),
            audience: owned("audience_keywords").into_iter().filter(|a| a != "pro").collect(),
            usage: owned("usage_keywords"),
            features: owned("feature_keywords"),
            professional: extracted.flag("is_professional"),
            high_quality: extracted.present_text("quality_tier") == Some("high"),
            has_image_descriptions: extracted.attributes.has_value("image_descriptions"),
            keywords: keywords.to_vec(),
        }
    }

    fn checklist(&self) -> [bool; 10] {
        [
            self.material.is_some(),
            self.color.is_some(),
            self.capacity.is_some(),
            self.brand.is_some(),
            self.connectivity.is_some() || self.battery.is_some(),
            !self.audience.is_empty(),
            self.professional,
            self.high_quality,
            self.has_image_descriptions,
            !self.keywords.is_empty(),
        ]
    }

    /// Fraction of the ten richness signals present
    pub fn richness(&self) -> f32 {
        self.checklist().iter().filter(|c| **c).count() as f32 / 10.0
    }

    /// 5 bullets above 0.8 richness, 4 above 0.6, otherwise 3
    pub fn target_count(&self) -> usize {
        match self.checklist().iter().filter(|c| **c).count() {
            9.. => 5,
            7..=8 => 4,
            _ => 3,
        }
    }

    fn has_feature(&self, candidates: &[&str]) -> bool {
        self.features.iter().any(|f| candidates.contains(&f.as_str()))
    }

    fn material_in(&self, candidates: &[&str]) -> bool {
        self.material
            .as_deref()
            .is_some_and(|m| words(m).iter().any(|w| candidates.contains(&w.as_str())))
    }
}

/// One angle a bullet can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    MaterialQuality,
    Functionality,
    DesignAesthetics,
    Performance,
    ValueProposition,
    UseCase,
    Durability,
    Comfort,
    Technology,
    Safety,
    Environmental,
    Convenience,
}

impl Aspect {
    pub const ALL: [Aspect; 12] = [
        Aspect::MaterialQuality,
        Aspect::Functionality,
        Aspect::DesignAesthetics,
        Aspect::Performance,
        Aspect::ValueProposition,
        Aspect::UseCase,
        Aspect::Durability,
        Aspect::Comfort,
        Aspect::Technology,
        Aspect::Safety,
        Aspect::Environmental,
        Aspect::Convenience,
    ];

    /// Aspect named by a schema bullet priority such as "material" or "comfort"
    pub fn from_priority(name: &str) -> Option<Aspect> {
        let aspect = match name.trim().to_lowercase().as_str() {
            "material" | "materials" | "quality" => Aspect::MaterialQuality,
            "feature" | "features" | "function" | "insulation" => Aspect::Functionality,
            "design" | "style" | "color" | "finish" => Aspect::DesignAesthetics,
            "performance" | "capacity" | "size" => Aspect::Performance,
            "brand" | "value" => Aspect::ValueProposition,
            "usage" | "use" | "use_case" => Aspect::UseCase,
            "durability" => Aspect::Durability,
            "comfort" | "grip" | "fit" | "ergonomics" => Aspect::Comfort,
            "technology" | "connectivity" | "battery" => Aspect::Technology,
            "safety" => Aspect::Safety,
            "environmental" | "eco" | "sustainability" => Aspect::Environmental,
            "convenience" => Aspect::Convenience,
            _ => return None,
        };
        Some(aspect)
    }

    fn descriptors(self) -> &'static [&'static str] {
        match self {
            Aspect::MaterialQuality => &["Durable", "Rugged", "Sturdy", "Solid"],
            Aspect::Functionality => &["Practical", "Functional", "Useful", "Handy"],
            Aspect::DesignAesthetics => &["Sleek", "Elegant", "Stylish", "Refined"],
            Aspect::Performance => &["Reliable", "Consistent", "Dependable", "Steady"],
            Aspect::ValueProposition => &["Thoughtful", "Careful", "Skilled", "Attentive"],
            Aspect::UseCase => &["Ideal", "Great", "Natural", "Perfect"],
            Aspect::Durability => &["Long-lasting", "Tough", "Hardwearing", "Robust"],
            Aspect::Comfort => &["Ergonomic", "Balanced", "Contoured", "Comfortable"],
            Aspect::Technology => &["Modern", "Advanced", "Seamless", "Smart"],
            Aspect::Safety => &["Safe", "Trusted", "Tested", "Worry-free"],
            Aspect::Environmental => &["Reusable", "Eco-conscious", "Sustainable", "Planet-friendly"],
            Aspect::Convenience => &["Easy", "Simple", "Effortless", "Quick"],
        }
    }

    fn has_signal(self, ctx: &BulletContext) -> bool {
        match self {
            Aspect::MaterialQuality => ctx.material.is_some(),
            Aspect::Functionality => !ctx.features.is_empty(),
            Aspect::DesignAesthetics => ctx.color.is_some() || ctx.finish.is_some(),
            Aspect::Performance => ctx.professional || ctx.high_quality || ctx.capacity.is_some(),
            Aspect::ValueProposition => ctx.brand.is_some(),
            Aspect::UseCase => !ctx.usage.is_empty(),
            Aspect::Durability => ctx.material.is_some() || ctx.professional || ctx.high_quality,
            Aspect::Comfort => !ctx.audience.is_empty() || ctx.has_feature(COMFORT_FEATURES),
            Aspect::Technology => ctx.connectivity.is_some() || ctx.battery.is_some(),
            Aspect::Safety => ctx.has_feature(SAFETY_FEATURES) || ctx.material_in(SAFE_MATERIALS),
            Aspect::Environmental => ctx.has_feature(ECO_FEATURES) || ctx.material_in(ECO_MATERIALS),
            Aspect::Convenience => {
                ctx.has_feature(CONVENIENCE_FEATURES) || ctx.usage.iter().any(|u| u == "travel")
            }
        }
    }

    /// Write this aspect's bullet, or `None` without a signal or an unused
    /// descriptor
    pub fn render(self, ctx: &BulletContext, used: &AHashSet<String>, banned: &PhraseMatcher) -> Option<String> {
        if !self.has_signal(ctx) {
            return None;
        }
        let d = self
            .descriptors()
            .iter()
            .copied()
            .find(|d| !used.contains(&d.to_lowercase()) && !banned.is_match(d))?;

        let sentence = match self {
            Aspect::MaterialQuality => {
                let material = ctx.material.as_deref()?;
                format!("{d} {material} construction resists dents, scratches and scuffs")
            }
            Aspect::Functionality => {
                let features: Vec<&str> = ctx.features.iter().take(2).map(String::as_str).collect();
                format!(
                    "{d} {} design keeps essentials organized through busy days",
                    join_natural(&features)
                )
            }
            Aspect::DesignAesthetics => {
                let look = match (ctx.color.as_deref(), ctx.finish.as_deref()) {
                    (Some(color), Some(finish)) => format!("{color} {finish}"),
                    (Some(color), None) => color.to_string(),
                    (None, Some(finish)) => finish.to_string(),
                    (None, None) => return None,
                };
                format!("{d} {look} finish adds a clean, polished look to any setting")
            }
            Aspect::Performance => match ctx.capacity.as_deref() {
                Some(capacity) => {
                    format!("{d} performance from a {capacity} capacity that matches demanding schedules")
                }
                None => format!("{d} performance matches demanding schedules from morning to night"),
            },
            Aspect::ValueProposition => {
                let brand = ctx.brand.as_deref()?;
                format!("{d} craftsmanship from {brand} delivers lasting value you can count on")
            }
            Aspect::UseCase => {
                let usage: Vec<&str> = ctx.usage.iter().take(3).map(String::as_str).collect();
                format!("{d} companion for {}, ready whenever plans change", join_natural(&usage))
            }
            Aspect::Durability => {
                format!("{d} build stands up to drops, bumps and years of regular handling")
            }
            Aspect::Comfort => {
                let audience: Vec<&str> = ctx.audience.iter().take(2).map(String::as_str).collect();
                if audience.is_empty() {
                    format!("{d} shape sits comfortably in hand through extended sessions")
                } else {
                    format!("{d} shape sits comfortably in hand for {}", join_natural(&audience))
                }
            }
            Aspect::Technology => match (ctx.connectivity.as_deref(), ctx.battery.as_deref()) {
                (Some(connectivity), _) => {
                    format!("{d} {connectivity} connectivity pairs quickly with phones, tablets and laptops")
                }
                (None, Some(battery)) => {
                    format!("{d} {} power runs for hours between charges", battery.to_lowercase())
                }
                (None, None) => return None,
            },
            Aspect::Safety => format!("{d} materials meet strict quality standards for peace of mind"),
            Aspect::Environmental => format!("{d} choice that helps cut down on single-use waste"),
            Aspect::Convenience => format!("{d} to carry, clean and store between uses"),
        };
        Some(sentence)
    }
}

fn significant_words(text: &str) -> AHashSet<String> {
    words(text)
        .into_iter()
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect()
}

fn prefix(text: &str) -> Vec<String> {
    words(text).into_iter().take(3).collect()
}

/// Whether a candidate is distinct from every accepted bullet
pub fn is_distinct(candidate: &str, accepted: &[String]) -> bool {
    let words_a = significant_words(candidate);
    let prefix_a = prefix(candidate);

    accepted.iter().all(|bullet| {
        let words_b = significant_words(bullet);
        let overlap = words_a.intersection(&words_b).count();
        let smaller = words_a.len().min(words_b.len());
        overlap as f32 <= MAX_OVERLAP * smaller as f32 && prefix(bullet) != prefix_a
    })
}

/// Up to three words from an accepted bullet that later bullets should not reuse
fn keywords_to_reserve(bullet: &str) -> Vec<String> {
    let mut reserved: Vec<String> = Vec::new();
    for word in words(bullet) {
        if reserved.len() == 3 {
            break;
        }
        if char_len(&word) > 4
            && !STOPWORDS.contains(&word.as_str())
            && !FILLER_VERBS.contains(&word.as_str())
            && !reserved.contains(&word)
        {
            reserved.push(word);
        }
    }
    reserved
}

pub struct BulletSynthesizer<'a> {
    validator: &'a ComplianceValidator,
    priorities: Vec<Aspect>,
}

impl<'a> BulletSynthesizer<'a> {
    pub fn new(validator: &'a ComplianceValidator) -> Self {
        Self {
            validator,
            priorities: Vec::new(),
        }
    }

    /// Visit the named aspects first, in the given order; unrecognized
    /// names are ignored and the remaining aspects keep their shuffled order
    #[must_use]
    pub fn with_priorities<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.priorities.clear();
        for aspect in names.iter().filter_map(|n| Aspect::from_priority(n.as_ref())) {
            if !self.priorities.contains(&aspect) {
                self.priorities.push(aspect);
            }
        }
        self
    }

    fn clean(&self, text: &str) -> String {
        self.validator
            .sanitize_line(text, self.validator.rules().limits.bullet_max_chars)
    }

    pub fn synthesize<R: Rng + ?Sized>(&self, ctx: &BulletContext, rng: &mut R) -> Vec<String> {
        let limits = &self.validator.rules().limits;
        let target = ctx.target_count().min(limits.max_bullets);
        let banned = self.validator.banned();

        let mut shuffled = Aspect::ALL.to_vec();
        shuffled.shuffle(rng);
        let order: Vec<Aspect> = self
            .priorities
            .iter()
            .copied()
            .chain(shuffled.into_iter().filter(|a| !self.priorities.contains(a)))
            .collect();

        let mut bullets: Vec<String> = Vec::with_capacity(target);
        let mut used: AHashSet<String> = AHashSet::new();

        for aspect in order {
            if bullets.len() >= target {
                break;
            }
            let Some(raw) = aspect.render(ctx, &used, banned) else {
                continue;
            };
            let candidate = self.clean(&raw);
            if candidate.is_empty() || !is_distinct(&candidate, &bullets) {
                tracing::debug!(aspect = ?aspect, "Rejected bullet candidate");
                continue;
            }
            used.extend(keywords_to_reserve(&candidate));
            bullets.push(candidate);
        }

        for filler in FILLER_BULLETS {
            if bullets.len() >= limits.min_bullets {
                break;
            }
            let candidate = self.clean(filler);
            if !is_distinct(&candidate, &bullets) {
                break;
            }
            bullets.push(candidate);
        }

        if bullets.len() < limits.min_bullets {
            tracing::warn!(
                bullets = bullets.len(),
                required = limits.min_bullets,
                "Could not write enough distinct bullets"
            );
        }

        tracing::debug!(
            target_count = target,
            written = bullets.len(),
            richness = ctx.richness(),
            "Synthesized bullets"
        );
        bullets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listforge_compliance::RuleSet;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn validator() -> ComplianceValidator {
        ComplianceValidator::new(RuleSet::default()).unwrap()
    }

    fn rich_context() -> BulletContext {
        BulletContext {
            brand: Some("HydroPeak".to_string()),
            material: Some("stainless steel".to_string()),
            color: Some("navy".to_string()),
            finish: Some("matte".to_string()),
            capacity: Some("750ml".to_string()),
            connectivity: None,
            battery: None,
            audience: vec!["athletes".to_string()],
            usage: vec!["gym".to_string(), "hiking".to_string()],
            features: vec!["insulated".to_string(), "leakproof".to_string(), "reusable".to_string()],
            professional: true,
            high_quality: true,
            has_image_descriptions: true,
            keywords: vec!["bottle".to_string(), "steel".to_string()],
        }
    }

    fn assert_distinct(bullets: &[String]) {
        for (i, bullet) in bullets.iter().enumerate() {
            assert!(
                is_distinct(bullet, &bullets[..i]),
                "Expected distinct bullets, got {:?}",
                bullets
            );
        }
    }

    #[test]
    fn test_richness_and_target() {
        let rich = rich_context();
        assert!((rich.richness() - 0.9).abs() < 1e-6, "Expected 0.9, got {}", rich.richness());
        assert_eq!(rich.target_count(), 5);

        let mut medium = rich_context();
        medium.professional = false;
        medium.high_quality = false;
        assert_eq!(medium.target_count(), 4);

        assert_eq!(BulletContext::default().target_count(), 3);
        assert_eq!(BulletContext::default().richness(), 0.0);
    }

    #[test]
    fn test_priority_names() {
        assert_eq!(Aspect::from_priority("Material"), Some(Aspect::MaterialQuality));
        assert_eq!(Aspect::from_priority("capacity"), Some(Aspect::Performance));
        assert_eq!(Aspect::from_priority("grip"), Some(Aspect::Comfort));
        assert_eq!(Aspect::from_priority("sparkle"), None);
    }

    #[test]
    fn test_priorities_lead_the_order() {
        let v = validator();
        for seed in 0..8 {
            let synth = BulletSynthesizer::new(&v).with_priorities(&["capacity", "sparkle", "material", "capacity"]);
            let bullets = synth.synthesize(&rich_context(), &mut StdRng::seed_from_u64(seed));

            assert!(bullets[0].starts_with("Reliable performance from a 750ml"), "got {:?}", bullets);
            assert!(bullets[1].starts_with("Durable stainless steel construction"), "got {:?}", bullets);
            assert_distinct(&bullets);
        }
    }

    #[test]
    fn test_rich_context_writes_five() {
        let v = validator();
        let synth = BulletSynthesizer::new(&v);
        let bullets = synth.synthesize(&rich_context(), &mut StdRng::seed_from_u64(7));

        assert_eq!(bullets.len(), 5, "Expected 5 bullets, got {:?}", bullets);
        assert_distinct(&bullets);
    }

    #[test]
    fn test_empty_context_uses_fillers() {
        let v = validator();
        let synth = BulletSynthesizer::new(&v);
        let bullets = synth.synthesize(&BulletContext::default(), &mut StdRng::seed_from_u64(1));

        assert_eq!(bullets, FILLER_BULLETS[..3].iter().map(|s| s.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_bullets() {
        let v = validator();
        let synth = BulletSynthesizer::new(&v);
        let a = synth.synthesize(&rich_context(), &mut StdRng::seed_from_u64(42));
        let b = synth.synthesize(&rich_context(), &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_without_signal() {
        let used = AHashSet::new();
        let v = validator();
        let ctx = BulletContext::default();
        for aspect in Aspect::ALL {
            assert!(aspect.render(&ctx, &used, v.banned()).is_none(), "{aspect:?} rendered without signal");
        }
    }

    #[test]
    fn test_used_descriptors_are_skipped() {
        let v = validator();
        let ctx = rich_context();
        let mut used: AHashSet<String> = ["durable", "rugged", "sturdy"].iter().map(|s| s.to_string()).collect();

        let bullet = Aspect::MaterialQuality.render(&ctx, &used, v.banned()).unwrap();
        assert!(bullet.starts_with("Solid stainless steel"), "got {bullet}");

        used.insert("solid".to_string());
        assert!(Aspect::MaterialQuality.render(&ctx, &used, v.banned()).is_none());
    }

    #[test]
    fn test_is_distinct() {
        let accepted = vec!["Durable steel construction resists dents".to_string()];
        assert!(!is_distinct("Durable steel construction for travel", &accepted));
        assert!(!is_distinct("Rugged steel construction resists dents", &accepted));
        assert!(is_distinct("Easy to carry, clean and store between uses", &accepted));
    }

    #[test]
    fn test_keywords_to_reserve() {
        assert_eq!(
            keywords_to_reserve("Sleek navy finish adds a clean, polished look"),
            vec!["sleek", "finish", "clean"]
        );
    }

    #[test]
    fn test_banned_brand_is_stripped() {
        let v = validator();
        let ctx = BulletContext {
            brand: Some("Prime Gear".to_string()),
            ..Default::default()
        };
        let raw = Aspect::ValueProposition.render(&ctx, &AHashSet::new(), v.banned()).unwrap();
        let cleaned = v.sanitize_line(&raw, 256);
        assert!(!v.banned().is_match(&cleaned), "got {cleaned}");
        assert!(cleaned.contains("from Gear"));
    }

    fn context() -> impl Strategy<Value = BulletContext> {
        let opt = |items: Vec<&'static str>| {
            prop::option::of(prop::sample::select(items)).prop_map(|o| o.map(str::to_string))
        };
        let list = |items: Vec<&'static str>| {
            prop::sample::subsequence(items.clone(), 0..=items.len())
                .prop_map(|v| v.into_iter().map(str::to_string).collect::<Vec<_>>())
        };
        (
            (
                opt(vec!["HydroPeak", "Acme", "Northwind"]),
                opt(vec!["stainless steel", "bamboo", "plastic", "glass"]),
                opt(vec!["navy", "black", "green"]),
                opt(vec!["matte", "glossy"]),
                opt(vec!["750ml", "1L"]),
                opt(vec!["Bluetooth", "USB-C"]),
                opt(vec!["Rechargeable"]),
            ),
            (
                list(vec!["athletes", "kids", "travelers"]),
                list(vec!["gym", "travel", "office", "hiking"]),
                list(vec!["insulated", "portable", "reusable", "bpa-free", "ergonomic"]),
                any::<bool>(),
                any::<bool>(),
                any::<bool>(),
                list(vec!["bottle", "steel", "hiking"]),
            ),
        )
            .prop_map(
                |(
                    (brand, material, color, finish, capacity, connectivity, battery),
                    (audience, usage, features, professional, high_quality, has_image_descriptions, keywords),
                )| BulletContext {
                    brand,
                    material,
                    color,
                    finish,
                    capacity,
                    connectivity,
                    battery,
                    audience,
                    usage,
                    features,
                    professional,
                    high_quality,
                    has_image_descriptions,
                    keywords,
                },
            )
    }

    proptest! {
        /// Property: 3 to 5 bullets, pairwise distinct, within limits
        #[test]
        fn bullets_are_bounded_and_distinct(ctx in context(), seed in any::<u64>()) {
            let v = validator();
            let bullets = BulletSynthesizer::new(&v).synthesize(&ctx, &mut StdRng::seed_from_u64(seed));

            prop_assert!((3..=5).contains(&bullets.len()), "got {:?}", bullets);
            prop_assert!(bullets.len() <= ctx.target_count().max(3));
            for (i, bullet) in bullets.iter().enumerate() {
                prop_assert!(is_distinct(bullet, &bullets[..i]));
                prop_assert!(char_len(bullet) <= 256);
                prop_assert!(!v.banned().is_match(bullet));
            }
        }
    }
}

//! # ListForge Compliance
//!
//! Marketplace compliance checking for generated listings.
//!
//! - [`RuleSet`] - declarative phrase lists, title characters, minor words
//!   and field limits, loadable from JSON with defaults
//! - [`ComplianceValidator::validate`] - errors, warnings and suggestions
//!   with a 0-100 compliance score
//! - [`ComplianceValidator::auto_fix`] - idempotent rewrite of title,
//!   bullets, description and search terms
//!
//! ```rust
//! use listforge_compliance::{ComplianceValidator, RuleSet};
//! use listforge_core::Listing;
//!
//! let validator = ComplianceValidator::new(RuleSet::default()).unwrap();
//! let listing = Listing {
//!     title: "BEST STEEL BOTTLE!!".to_string(),
//!     ..Default::default()
//! };
//!
//! let report = validator.validate(&listing);
//! assert!(!report.is_valid);
//!
//! let fixed = validator.auto_fix(&listing);
//! assert_eq!(fixed.title, "Steel Bottle");
//! ```

pub mod autofix;
pub mod casing;
pub mod patterns;
pub mod rules;
pub mod validator;

pub use patterns::PhraseMatcher;
pub use rules::{FieldLimits, RuleSet};
pub use validator::{compliance_score, ComplianceValidator, ValidationResult};

//! # ListForge Classifier
//!
//! Multi-signal category classification with explainable scores.
//!
//! For every category in the store three signals are computed:
//!
//! - **keyword**: overlap between post keywords and category keywords,
//!   boosted for the category's primary keywords
//! - **semantic**: cosine similarity between the post embedding and the
//!   category embedding
//! - **image**: detected objects matching category keywords, weighted by
//!   detection confidence
//!
//! The weighted sum is halved for categories whose primary keywords are
//! absent from the first half of the post text, so an incidental mention
//! near the end does not win.
//!
//! ```text
//! TextFeatures ──┐
//!                ├──> keyword / semantic / image ──> combine ──> penalty ──> argmax
//! ImageFeatures ─┘                                                             │
//!                                                              Classification ─┘
//! ```

pub mod classifier;
pub mod explain;
pub mod signals;

pub use classifier::{CategoryClassifier, ClassifierConfig};
pub use explain::{CategoryScore, Classification};
pub use listforge_schema::UNKNOWN_CATEGORY;
pub use signals::SignalWeights;

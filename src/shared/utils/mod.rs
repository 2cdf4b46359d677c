/// Utility modules
pub mod tag_normalizer;

pub use tag_normalizer::{normalize_tags, TagField};

//! Placeholder tag normalisation.
//!
//! Authors write `{{ First_Name }}`, `{{first_name }}` and so on; the sending
//! side only understands the canonical `{{first_name}}`. Recognised tags are
//! rewritten before anything is stored, unknown tags are left alone.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_]+)\s*\}\}").expect("tag pattern is a valid regex")
});

/// Tags understood in any text field.
const SUBSCRIBER_TAGS: [&str; 5] = [
    "email",
    "first_name",
    "last_name",
    "unsubscribe_url",
    "webview_url",
];

/// Slot that receives the campaign body; only meaningful in template content.
const CONTENT_TAG: &str = "content";

/// Which field the text came from. Decides the recognised tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Content,
    Subject,
}

impl TagField {
    fn recognises(self, tag: &str) -> bool {
        SUBSCRIBER_TAGS.contains(&tag) || (self == TagField::Content && tag == CONTENT_TAG)
    }
}

/// Rewrite recognised placeholders to `{{tag}}`: lowercase, no inner spaces.
pub fn normalize_tags(text: &str, field: TagField) -> String {
    TAG_PATTERN
        .replace_all(text, |caps: &Captures| {
            let tag = caps[1].to_ascii_lowercase();
            if field.recognises(&tag) {
                format!("{{{{{}}}}}", tag)
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

pub mod template_rules;

pub use template_rules::*;

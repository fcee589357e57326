//! Answer text → ordered, typed sections.

pub mod assembler;
pub mod classifier;
pub mod splitter;
pub mod suggestions;

pub use assembler::{MessageAssembler, GENERIC_ERROR_TEXT};
pub use classifier::{classify, ClassificationRule, RULES};
pub use splitter::split_sections;
pub use suggestions::extract_suggestions;

use crate::types::Section;

/// Split an answer into chunks and classify each one, preserving order.
pub fn build_sections(answer: &str) -> Vec<Section> {
    split_sections(answer).into_iter().map(classify).collect()
}

/// Chunk boundary inside an answer.
pub const SECTION_DELIMITER: &str = "\n\n";

/// Split answer text on blank-line boundaries.
///
/// Empty chunks are kept so that every chunk maps to exactly one section.
pub fn split_sections(text: &str) -> Vec<&str> {
    text.split(SECTION_DELIMITER).collect()
}

/// Separator between suggestions in a "Proactive Suggestions:" chunk.
pub const SUGGESTION_DELIMITER: &str = "?,";

/// Break a suggestion list into individual questions, each ending in `?`.
///
/// A question that itself contains `?,` is split in two; the producer of the
/// text offers no escaping.
pub fn extract_suggestions(text: &str) -> Vec<String> {
    text.split(SUGGESTION_DELIMITER)
        .map(|piece| {
            if piece.ends_with('?') {
                piece.to_string()
            } else {
                format!("{}?", piece)
            }
        })
        .collect()
}

//! Markup stripping for free-text fields.

/// Trim, drop every `<` and `>`, then trim whatever whitespace the removal
/// exposed.
///
/// Purely textual: entities such as `&lt;` are left alone. Idempotent.
pub fn sanitize(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>'))
        .collect::<String>()
        .trim()
        .to_string()
}

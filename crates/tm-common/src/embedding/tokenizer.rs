/// Lowercased word tokens from free text. Splits on anything that is not
/// alphanumeric, so punctuation and the "Label:" separators from extraction
/// never become tokens of their own.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Collapse runs of whitespace (including newlines) into single spaces and
/// trim the ends. Extraction output must be byte-stable for identical input,
/// so this is the only whitespace treatment applied anywhere.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Language-level fields carry explicit "no level" markers instead of being
/// left out. A marked field must not emit its label into extracted text.
pub fn is_absent_level(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == "-" || trimmed.eq_ignore_ascii_case("nenhum")
}

/// Option helper: the trimmed string, or None when empty/absent.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

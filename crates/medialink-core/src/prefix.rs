//! Listing prefix normalization.

/// Normalize a caller-supplied directory prefix.
///
/// Leading and trailing whitespace, byte order marks (`U+FEFF`) and `/` are
/// stripped in any interleaving, so `" / a / "` gives `"a/"`. A single `/` is
/// appended when anything is left. The result never starts with `/`, ends with exactly one `/` when
/// non-empty, and normalizing it again returns it unchanged.
///
/// # Examples
///
/// ```
/// use medialink_core::prefix::normalize_prefix;
///
/// assert_eq!(normalize_prefix("///folder///"), "folder/");
/// assert_eq!(normalize_prefix("  folder  "), "folder/");
/// assert_eq!(normalize_prefix("///"), "");
/// ```
#[must_use]
pub fn normalize_prefix(raw: &str) -> String {
    let clean = raw.trim_matches(|c: char| c == '/' || c == '\u{feff}' || c.is_whitespace());
    if clean.is_empty() {
        String::new()
    } else {
        format!("{clean}/")
    }
}

/// The ID used when a heading has no characters that survive slugification.
pub const FALLBACK_ID: &str = "heading";

/// Is this a whitespace character for the purposes of heading syntax and
/// slugs? This is Unicode `White_Space` minus NEL, plus the byte-order mark,
/// which is the set JavaScript's `\s` matches. Content written for the web
/// front end expects exactly that set.
pub(crate) fn is_space(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// Trim leading and trailing whitespace, in the sense of `is_space`.
pub(crate) fn trim_space(s: &str) -> &str {
    s.trim_matches(is_space)
}

/// Turn heading text into a URL-friendly anchor ID.
///
/// The text is lowercased and everything except ASCII letters, digits,
/// whitespace, and hyphens is dropped. Runs of whitespace and hyphens become a
/// single hyphen, and hyphens at either end are removed. If nothing is left,
/// this returns [`FALLBACK_ID`].
pub fn generate_heading_id(text: &str) -> String {
    let mut id = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            // Only emit a separator between two kept characters, which takes
            // care of collapsing runs and stripping the ends.
            if pending_dash && !id.is_empty() {
                id.push('-');
            }
            pending_dash = false;
            id.push(c);
        } else if c == '-' || is_space(c) {
            pending_dash = true;
        }
    }

    if id.is_empty() {
        FALLBACK_ID.to_string()
    } else {
        id
    }
}

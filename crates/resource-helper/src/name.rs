//! Store-legal node names
//!
//! The store accepts only a subset of characters in a path segment. This
//! module maps arbitrary identifiers (job topics, queue names, ...) onto
//! that subset.

use resource_store::ResourcePath;

/// Substituted for characters outside [`ALLOWED`].
pub const REPLACEMENT_CHAR: char = '_';

/// Characters allowed in a node name, besides ASCII letters and digits.
const ALLOWED: &str = " _,.-+#!?$%&()=";

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || ALLOWED.contains(c)
}

/// Turn an arbitrary identifier into a legal node name.
///
/// - Allowed characters are kept. A leading digit is prefixed with
///   [`REPLACEMENT_CHAR`].
/// - Each run of disallowed characters becomes a single
///   [`REPLACEMENT_CHAR`], and nothing is substituted directly after an
///   underscore already in the output.
/// - An empty result becomes a single [`REPLACEMENT_CHAR`].
///
/// Names that are already legal and do not start with a digit come back
/// unchanged, so applying the filter twice is the same as applying it once.
pub fn filter_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 1);
    let mut last_added: Option<char> = None;

    for (i, c) in raw.chars().enumerate() {
        let to_add = if !is_allowed(c) {
            if last_added == Some(REPLACEMENT_CHAR) {
                continue;
            }
            REPLACEMENT_CHAR
        } else {
            if i == 0 && c.is_ascii_digit() {
                out.push(REPLACEMENT_CHAR);
            }
            c
        };

        out.push(to_add);
        last_added = Some(to_add);
    }

    if out.is_empty() {
        out.push(REPLACEMENT_CHAR);
    }
    out
}

/// Whether `name` would pass through [`filter_name`] unchanged.
pub fn is_legal_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(is_allowed)
}

/// Append `raw` to `base` as a single filtered segment.
pub fn join_filtered(base: &ResourcePath, raw: &str) -> ResourcePath {
    base.join(filter_name(raw))
}

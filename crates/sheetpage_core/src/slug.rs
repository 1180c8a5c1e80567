//! Location-path slug derivation and key normalization.

/// Derive the lookup slug from a location path: the final path segment,
/// normalized with [`normalize_key`]. Query strings and fragments are
/// ignored, as are trailing slashes, so `/products/Sermorelin/` and
/// `/sermorelin` both yield `sermorelin`. The root path yields an empty
/// slug, which matches nothing.
pub fn slug_from_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let trimmed = path.trim().trim_matches('/');
    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    normalize_key(last)
}

/// Normalize a slug or slug cell for matching: non-breaking spaces become
/// regular spaces, surrounding whitespace is trimmed, at most one leading
/// slash is stripped, and the result is lowercased.
pub fn normalize_key(raw: &str) -> String {
    let folded = raw.replace('\u{a0}', " ");
    let mut key = folded.trim();
    key = key.strip_prefix('/').unwrap_or(key);
    key.trim().to_lowercase()
}

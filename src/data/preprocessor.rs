// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Canonicalises free text before it is vectorised or compared.
//
// Cleaning steps (applied in order):
//   1. Lower-case every character
//   2. Drop everything that is not an ASCII letter, an ASCII
//      digit, or whitespace
//   3. Split on whitespace and rejoin with single spaces
//
// The result contains only [a-z0-9] tokens separated by single
// spaces, with no leading or trailing space. Applying it twice
// changes nothing.
//
// Example:
//   "  What's   the WEATHER?? "  →  "whats the weather"
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

pub struct Preprocessor;

impl Preprocessor {
    /// Create a new Preprocessor instance
    pub fn new() -> Self {
        Self
    }

    /// Normalise a raw string. Total: any input, including the
    /// empty string, yields a (possibly empty) output.
    pub fn normalize(&self, text: &str) -> String {
        // ── Steps 1 + 2: lower-case, then keep [a-z0-9] and whitespace ───────
        // Lower-casing comes first because a few non-ASCII capitals
        // lower-case to ASCII (KELVIN SIGN → 'k') and must survive.
        let kept: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
            .collect();

        // ── Step 3: collapse whitespace runs and trim the edges ───────────────
        kept.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Feature tokens of an already-normalised string: whitespace
    /// tokens of two or more characters. Single letters such as
    /// "a" or "i" carry no weight in the vector space.
    pub fn feature_tokens<'a>(&self, normalized: &'a str) -> impl Iterator<Item = &'a str> {
        normalized
            .split_whitespace()
            .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
    }
}

/// Shortest token that becomes a vocabulary feature.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Implement Default so Preprocessor can be created with Preprocessor::default()
impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

//! Conversion of human job names into lookup labels.

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| compile(r"[^-_a-zA-Z0-9 ]"));
static SEPARATORS: Lazy<Regex> = Lazy::new(|| compile(r"[ _-]+"));

// Patterns are literals; a failure here is a programming error.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static label pattern must compile")
}

/// Convert a job name into its label.
///
/// Characters outside `[A-Za-z0-9 _-]` are dropped, every run of spaces,
/// underscores, or hyphens becomes a single hyphen, hyphens at either end are
/// removed, and the result is lowercased. The function is total and
/// idempotent.
#[must_use]
pub fn normalize(name: &str) -> String {
    let kept = DISALLOWED.replace_all(name, "");
    let hyphenated = SEPARATORS.replace_all(&kept, "-");
    let trimmed = hyphenated.strip_prefix('-').unwrap_or(&hyphenated);
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);
    trimmed.to_ascii_lowercase()
}

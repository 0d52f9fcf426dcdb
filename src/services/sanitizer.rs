use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^```[A-Za-z0-9_+-]*[ \t]*\r?\n?").expect("LEADING_FENCE is a valid regex pattern")
});

static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n?```$").expect("TRAILING_FENCE is a valid regex pattern"));

/// Strips code-fence markers wrapped around a model response.
///
/// Removes a leading fence with an optional language tag and a trailing bare
/// fence, trimming whitespace, until nothing changes. Prose before or after
/// the payload is left alone.
pub fn sanitize(raw: &str) -> String {
    let mut current = raw.trim().to_string();
    loop {
        let without_leading = LEADING_FENCE.replace(&current, "");
        let without_trailing = TRAILING_FENCE.replace(without_leading.trim(), "");
        let next = without_trailing.trim().to_string();
        if next == current {
            return current;
        }
        current = next;
    }
}

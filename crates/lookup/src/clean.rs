//! Text clean-up applied to lookup results before they reach the form.

/// Longest summary, in characters, copied from a lookup result.
pub const SUMMARY_MAX_CHARS: usize = 500;

/// Marker appended to a summary that was cut short.
pub const ELLIPSIS: &str = "...";

/// Remove every `<...>` markup tag. A `<` with no closing `>` is kept as text.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Cut `input` to at most `max_chars` characters, appending [`ELLIPSIS`] when
/// anything was dropped.
pub fn truncate_chars(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &input[..cut], ELLIPSIS),
        None => input.to_string(),
    }
}

/// Markup-free summary of at most [`SUMMARY_MAX_CHARS`] characters plus the
/// ellipsis marker.
pub fn clean_summary(description: &str) -> String {
    truncate_chars(&strip_tags(description), SUMMARY_MAX_CHARS)
}

/// Force the secure scheme on a cover image URL.
pub fn secure_url(url: &str) -> String {
    match url.strip_prefix("http:") {
        Some(rest) => format!("https:{rest}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_but_keeps_text() {
        assert_eq!(
            strip_tags("<p>Un <b>conte</b> poétique<br/></p>"),
            "Un conte poétique"
        );
        assert_eq!(strip_tags("3 < 4 et rien"), "3 < 4 et rien");
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_chars("abc", 5), "abc");
        assert_eq!(truncate_chars("abcde", 5), "abcde");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(600);
        let out = truncate_chars(&text, SUMMARY_MAX_CHARS);
        assert_eq!(out.chars().count(), SUMMARY_MAX_CHARS + ELLIPSIS.len());
        assert!(out.ends_with(ELLIPSIS));
    }

    #[test]
    fn long_description_becomes_500_chars_and_ellipsis_without_markup() {
        let description = format!("<p>{}</p>", "a".repeat(700));
        let summary = clean_summary(&description);

        assert_eq!(summary, format!("{}...", "a".repeat(500)));
        assert!(!summary.contains('<'));
    }

    #[test]
    fn cover_urls_are_upgraded_to_https() {
        assert_eq!(
            secure_url("http://books.google.com/books/content?id=1"),
            "https://books.google.com/books/content?id=1"
        );
        assert_eq!(secure_url("https://x/y"), "https://x/y");
    }
}

//! Excerpts shown under search results.
//!
//! All positions and lengths count characters, so a window never splits a
//! UTF-8 sequence.

const ELLIPSIS: &str = "...";
const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// Characters kept before the first highlight.
const HIGHLIGHT_LEAD: usize = 75;
/// Characters kept before the first query match.
const QUERY_LEAD: usize = 50;
/// A window that starts mid-text snaps to a tag opening within this many characters.
const TAG_SNAP: usize = 10;

/// Remove HTML tags, keeping their text content.
///
/// A `<` only opens a tag when followed by a letter, `/`, `!` or `?`; other
/// `<` characters are kept. An unterminated tag drops the rest of the input.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.chars().peekable();

    while let Some(c) = chars.next() {
        let opens_tag = c == '<'
            && chars
                .peek()
                .is_some_and(|n| n.is_ascii_alphabetic() || matches!(n, '/' | '!' | '?'));
        if opens_tag {
            for c in chars.by_ref() {
                if c == '>' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }

    out
}

/// Truncate `text` to `len` characters, appending `...` when cut.
///
/// Trailing whitespace before the ellipsis is removed.
///
/// # Examples
///
/// ```
/// use tabdoc_search::limit;
///
/// assert_eq!(limit("Buttons and badges", 8), "Buttons...");
/// assert_eq!(limit("Card", 8), "Card");
/// ```
#[must_use]
pub fn limit(text: &str, len: usize) -> String {
    match text.char_indices().nth(len) {
        None => text.to_owned(),
        Some((end, _)) => format!("{}{ELLIPSIS}", text[..end].trim_end()),
    }
}

/// Byte offset of the character at index `chars` (or the end of `text`).
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

/// Up to `len` characters of `text` starting at character `start`.
fn char_window(text: &str, start: usize, len: usize) -> &str {
    let rest = &text[byte_offset(text, start)..];
    &rest[..byte_offset(rest, len)]
}

/// Whether `s` could be the remainder of a cut tag (`mark`, `/mark`, `ma`).
fn is_tag_fragment(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric() || c == '/')
}

/// Drop a tag cut off at the start of the window.
fn repair_head(excerpt: &str) -> &str {
    match excerpt.find('>') {
        Some(gt) if !excerpt[..gt].contains('<') && is_tag_fragment(&excerpt[..gt]) => {
            &excerpt[gt + 1..]
        }
        _ => excerpt,
    }
}

/// Drop a tag cut off at the end of the window and close an open highlight.
fn repair_tail(excerpt: &str) -> String {
    let mut kept = excerpt;
    if let Some(lt) = kept.rfind('<') {
        let fragment = &kept[lt + 1..];
        if !fragment.contains('>') && is_tag_fragment(fragment) {
            kept = &kept[..lt];
        }
    }

    let mut out = kept.to_owned();
    if out.matches(MARK_OPEN).count() > out.matches(MARK_CLOSE).count() {
        out.push_str(MARK_CLOSE);
    }
    out
}

/// Excerpt of highlighted content around its first `<mark>`.
///
/// Without a highlight the tags are stripped and the text is limited to
/// `len` characters. Otherwise a window of `len` characters starts 75
/// characters before the highlight; a window starting mid-text snaps
/// forward to a tag opening within its first 10 characters. The result is
/// prefixed with `...` when it does not start at the beginning and always
/// ends with `...`.
#[must_use]
pub fn highlighted_excerpt(content: &str, len: usize) -> String {
    let Some(mark_byte) = content.find(MARK_OPEN) else {
        return limit(&strip_tags(content), len);
    };

    let mark_pos = content[..mark_byte].chars().count();
    let start = mark_pos.saturating_sub(HIGHLIGHT_LEAD);
    let mut excerpt = char_window(content, start, len);

    if start > 0 && !excerpt.starts_with(MARK_OPEN) {
        if let Some((idx, _)) = excerpt
            .char_indices()
            .take(TAG_SNAP)
            .find(|(_, c)| *c == '<')
        {
            excerpt = &excerpt[idx..];
        }
        excerpt = repair_head(excerpt);
    }

    let prefix = if start > 0 { ELLIPSIS } else { "" };
    format!("{prefix}{}{ELLIPSIS}", repair_tail(excerpt))
}

/// Character index of the first case-insensitive occurrence of `needle`.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() {
        return None;
    }
    let haystack: Vec<char> = haystack.chars().collect();
    haystack.windows(needle.len()).position(|window| {
        window
            .iter()
            .zip(&needle)
            .all(|(a, b)| a.to_lowercase().eq(b.to_lowercase()))
    })
}

/// Excerpt of plain content around the first case-insensitive `query` match.
///
/// Tags are stripped first. Without a match the text is limited to `len`
/// characters. Otherwise a window of `len` characters starts 50 characters
/// before the match, prefixed with `...` when it does not start at the
/// beginning and always followed by `...`.
#[must_use]
pub fn query_excerpt(content: &str, query: &str, len: usize) -> String {
    let text = strip_tags(content);
    let Some(pos) = find_case_insensitive(&text, query) else {
        return limit(&text, len);
    };

    let start = pos.saturating_sub(QUERY_LEAD);
    let prefix = if start > 0 { ELLIPSIS } else { "" };
    format!("{prefix}{}{ELLIPSIS}", char_window(&text, start, len))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hi <b>there</b></p>"), "Hi there");
        assert_eq!(strip_tags("<!-- note -->text"), "text");
        assert_eq!(strip_tags("a < b and c<d"), "a < b and c");
    }

    #[test]
    fn test_limit() {
        assert_eq!(limit("Hello world", 11), "Hello world");
        assert_eq!(limit("Hello world", 5), "Hello...");
        assert_eq!(limit("Hello world", 6), "Hello...");
        assert_eq!(limit("Привет мир", 6), "Привет...");
        assert_eq!(limit("", 3), "");
    }

    #[test]
    fn test_query_excerpt_at_start() {
        assert_eq!(
            query_excerpt("Button component docs", "button", 150),
            "Button component docs..."
        );
    }

    #[test]
    fn test_query_excerpt_centered() {
        let content = format!("{}needle{}", "a".repeat(100), "b".repeat(100));
        let excerpt = query_excerpt(&content, "NEEDLE", 150);

        let expected = format!("...{}needle{}...", "a".repeat(50), "b".repeat(94));
        assert_eq!(excerpt, expected);
    }

    #[test]
    fn test_query_excerpt_multibyte() {
        let content = format!("{}needle{}", "é".repeat(100), "ü".repeat(100));
        let excerpt = query_excerpt(&content, "needle", 150);

        assert!(excerpt.starts_with("...éé"));
        assert_eq!(excerpt.chars().count(), 150 + 6);
    }

    #[test]
    fn test_query_excerpt_without_match() {
        let content = format!("<p>{}</p>", "x".repeat(200));
        assert_eq!(
            query_excerpt(&content, "zzz", 150),
            format!("{}...", "x".repeat(150))
        );
    }

    #[test]
    fn test_query_excerpt_strips_tags_before_matching() {
        assert_eq!(
            query_excerpt("<x-alert>Save</x-alert>", "alert", 150),
            "Save"
        );
    }

    #[test]
    fn test_highlighted_excerpt_without_mark() {
        assert_eq!(highlighted_excerpt("<b>Plain</b> text", 200), "Plain text");
    }

    #[test]
    fn test_highlighted_excerpt_near_start() {
        assert_eq!(
            highlighted_excerpt("Use <mark>button</mark> here", 200),
            "Use <mark>button</mark> here..."
        );
    }

    #[test]
    fn test_highlighted_excerpt_window() {
        let content = format!("{}<mark>hit</mark>{}", "x".repeat(100), "y".repeat(300));
        let expected = format!("...{}<mark>hit</mark>{}...", "x".repeat(75), "y".repeat(109));
        assert_eq!(highlighted_excerpt(&content, 200), expected);
    }

    #[test]
    fn test_highlighted_excerpt_snaps_to_tag() {
        let content = format!(
            "{}<em>note</em> {}<mark>m</mark>tail",
            "x".repeat(10),
            "w".repeat(58)
        );
        let expected = format!("...<em>note</em> {}<mark>m</mark>tail...", "w".repeat(58));
        assert_eq!(highlighted_excerpt(&content, 200), expected);
    }

    #[test]
    fn test_highlighted_excerpt_drops_cut_tag_at_tail() {
        let content = format!(
            "{}<mark>a</mark>{}<mark>b</mark>{}",
            "x".repeat(80),
            "y".repeat(108),
            "z".repeat(50)
        );
        let expected = format!("...{}<mark>a</mark>{}...", "x".repeat(75), "y".repeat(108));
        assert_eq!(highlighted_excerpt(&content, 200), expected);
    }

    #[test]
    fn test_highlighted_excerpt_closes_open_mark() {
        let content = format!("{}<mark>{}</mark>", "x".repeat(80), "a".repeat(300));
        let expected = format!("...{}<mark>{}</mark>...", "x".repeat(75), "a".repeat(119));
        assert_eq!(highlighted_excerpt(&content, 200), expected);
    }

    #[test]
    fn test_highlighted_excerpt_multibyte_does_not_panic() {
        let content = format!("{}<mark>ß</mark>{}", "ä".repeat(90), "ö".repeat(300));
        let excerpt = highlighted_excerpt(&content, 200);
        assert!(excerpt.contains("<mark>ß</mark>"));
        assert!(excerpt.starts_with("...ää"));
    }
}

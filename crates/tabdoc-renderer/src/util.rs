//! Shared text helpers: slugs, display titles and heading levels.

use pulldown_cmark::HeadingLevel;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Fold letters to their ASCII base where a simple mapping exists.
///
/// Decomposes (NFKD) and drops combining marks, so `é` becomes `e`, and
/// expands the few letters that have no decomposition. Letters from other
/// scripts are kept as-is.
fn fold_to_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfkd().filter(|c| !is_combining_mark(*c)) {
        match c {
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("AE"),
            'œ' => out.push_str("oe"),
            'Œ' => out.push_str("OE"),
            'ø' => out.push('o'),
            'Ø' => out.push('O'),
            'đ' => out.push('d'),
            'Đ' => out.push('D'),
            'ł' => out.push('l'),
            'Ł' => out.push('L'),
            'þ' => out.push_str("th"),
            'Þ' => out.push_str("TH"),
            _ => out.push(c),
        }
    }
    out
}

/// Convert text to a URL-safe slug.
///
/// The same function produces navigation slugs, heading ids and table of
/// contents anchors:
///
/// - accented letters are folded to ASCII
/// - `_` counts as a separator and `@` becomes `at`
/// - everything except letters, digits, whitespace and `-` is dropped
/// - runs of whitespace and `-` collapse to one `-`, trimmed at both ends
///
/// # Examples
///
/// ```
/// use tabdoc_renderer::slugify;
///
/// assert_eq!(slugify("Foo Bar"), "foo-bar");
/// assert_eq!(slugify("date_picker"), "date-picker");
/// assert_eq!(slugify("Email @ Work!"), "email-at-work");
/// assert_eq!(slugify("Café Menu"), "cafe-menu");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let folded = fold_to_ascii(text).replace('@', "-at-");

    let mut result = String::with_capacity(folded.len());
    let mut pending_dash = false;

    for c in folded.chars().flat_map(char::to_lowercase) {
        if c == '-' || c == '_' || c.is_whitespace() {
            pending_dash = true;
        } else if c.is_alphanumeric() {
            if pending_dash && !result.is_empty() {
                result.push('-');
            }
            pending_dash = false;
            result.push(c);
        }
        // Any other character is dropped without acting as a separator
    }

    result
}

/// Turn a file or directory base name into a display title.
///
/// `-` and `_` become spaces; the first letter of each word is upper-cased
/// and the remaining letters lower-cased. A letter starts a word when it
/// does not follow another letter (an apostrophe inside a word does not
/// start a new one).
///
/// # Examples
///
/// ```
/// use tabdoc_renderer::title_case;
///
/// assert_eq!(title_case("date-picker"), "Date Picker");
/// assert_eq!(title_case("getting_started"), "Getting Started");
/// assert_eq!(title_case("README"), "Readme");
/// ```
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;

    for c in name.chars() {
        let c = if c == '-' || c == '_' { ' ' } else { c };
        if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        in_word = c.is_alphabetic() || (in_word && matches!(c, '\'' | '\u{2019}'));
    }

    out
}

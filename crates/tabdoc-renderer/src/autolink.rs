//! Extended autolinks for bare URLs in text.
//!
//! `https://…`, `http://…` and `www.…` runs in plain text become links. As in
//! GitHub's extension, trailing punctuation is not part of the link and a
//! closing parenthesis is only kept when it balances an opening one.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::state::escape_html;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<]+").expect("valid regex"));

/// Trim characters that end a sentence rather than a URL.
fn trim_url(candidate: &str) -> &str {
    let mut url = candidate;
    loop {
        let Some(last) = url.chars().last() else {
            return url;
        };
        let trim = match last {
            '?' | '!' | '.' | ',' | ':' | '*' | '_' | '~' | '\'' | '"' | ';' => true,
            ')' => url.matches(')').count() > url.matches('(').count(),
            _ => false,
        };
        if !trim {
            return url;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
}

/// Escape `text` into `out`, turning bare URLs into links.
pub(crate) fn write_autolinked(text: &str, out: &mut String) {
    let mut last = 0;

    for m in URL_RE.find_iter(text) {
        let url = trim_url(m.as_str());
        // Need a dot after the scheme or `www` to count as a domain
        let host = url.split_once("://").map_or(url, |(_, rest)| rest);
        if url.is_empty() || !host.contains('.') {
            continue;
        }

        out.push_str(&escape_html(&text[last..m.start()]));
        let href = if url.len() >= 4 && url[..4].eq_ignore_ascii_case("www.") {
            format!("http://{url}")
        } else {
            url.to_owned()
        };
        write!(
            out,
            r#"<a href="{}">{}</a>"#,
            escape_html(&href),
            escape_html(url)
        )
        .unwrap();
        last = m.start() + url.len();
    }

    out.push_str(&escape_html(&text[last..]));
}

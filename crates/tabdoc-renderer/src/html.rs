//! HTML fragments written by the renderer.
//!
//! Class names follow the Tabler UI conventions used by the documentation
//! site's stylesheet (`alert alert-info`, `card`, ...).

use std::fmt::Write;

use pulldown_cmark::BlockQuoteKind;

use crate::state::escape_html;

/// Class of the permalink anchor placed before each heading's text.
pub(crate) const PERMALINK_CLASS: &str = "heading-permalink";

/// GitHub-style alert kinds (`> [!NOTE]`, `> [!WARNING]`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl From<BlockQuoteKind> for AlertKind {
    fn from(kind: BlockQuoteKind) -> Self {
        match kind {
            BlockQuoteKind::Note => Self::Note,
            BlockQuoteKind::Tip => Self::Tip,
            BlockQuoteKind::Important => Self::Important,
            BlockQuoteKind::Warning => Self::Warning,
            BlockQuoteKind::Caution => Self::Caution,
        }
    }
}

impl AlertKind {
    /// Tabler alert variant and heading text.
    fn variant_and_title(self) -> (&'static str, &'static str) {
        match self {
            Self::Note => ("info", "Note"),
            Self::Tip => ("success", "Tip"),
            Self::Important => ("primary", "Important"),
            Self::Warning => ("warning", "Warning"),
            Self::Caution => ("danger", "Caution"),
        }
    }
}

pub(crate) fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
    if let Some(lang) = lang {
        write!(
            out,
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(lang),
            escape_html(content)
        )
        .unwrap();
    } else {
        write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap();
    }
}

pub(crate) fn alert_start(kind: AlertKind, out: &mut String) {
    let (variant, title) = kind.variant_and_title();
    write!(
        out,
        r#"<div class="alert alert-{variant}" role="alert"><h4 class="alert-title">{title}</h4><div class="alert-content">"#
    )
    .unwrap();
}

pub(crate) fn alert_end(out: &mut String) {
    out.push_str("</div></div>");
}

pub(crate) fn image(src: &str, alt: &str, title: &str, out: &mut String) {
    let title_attr = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    };
    write!(
        out,
        r#"<img src="{}"{title_attr} alt="{}">"#,
        escape_html(src),
        escape_html(alt)
    )
    .unwrap();
}

/// Write a complete heading with its id and a permalink before the text.
pub(crate) fn heading(level: u8, id: &str, inner_html: &str, out: &mut String) {
    write!(
        out,
        r##"<h{level} id="{id}"><a class="{PERMALINK_CLASS}" href="#{id}" aria-hidden="true" title="Permalink">#</a>{}</h{level}>"##,
        inner_html.trim()
    )
    .unwrap();
}

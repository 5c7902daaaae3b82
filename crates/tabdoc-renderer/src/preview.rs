//! `:::preview` blocks.
//!
//! A preview block shows a component twice: rendered live, and as source in a
//! collapsible code view.
//!
//! ```text
//! :::preview
//! <x-button color="primary">Save</x-button>
//! :::
//! ```
//!
//! Blocks are matched non-greedily (the first `:::` after the opening closes
//! the block) and do not nest. Their content is lifted out of the markdown
//! before parsing and replaced by an HTML comment placeholder, which the
//! parser passes through untouched. After rendering, each placeholder is
//! swapped for the widget markup.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::state::escape_html;

static PREVIEW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s):::preview\s+(.*?)\s+:::").expect("valid regex"));

fn placeholder(index: usize) -> String {
    format!("<!--tabdoc-preview-{index}-->")
}

/// One extracted preview block.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PreviewBlock {
    /// Full matched source, including the `:::preview` and `:::` fences.
    source: String,
    /// Inner markup, trimmed.
    code: String,
}

/// Preview blocks lifted out of a markdown source.
#[derive(Debug, Default)]
pub struct PreviewBlocks {
    blocks: Vec<PreviewBlock>,
}

impl PreviewBlocks {
    /// Replace every preview block in `markdown` with a placeholder.
    ///
    /// Returns the rewritten markdown and the extracted blocks.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabdoc_renderer::PreviewBlocks;
    ///
    /// let (markdown, blocks) = PreviewBlocks::extract(":::preview\n<b>Hi</b>\n:::");
    /// assert_eq!(blocks.len(), 1);
    /// assert!(!markdown.contains(":::"));
    /// ```
    #[must_use]
    pub fn extract(markdown: &str) -> (String, Self) {
        let mut blocks = Vec::new();
        let rewritten = PREVIEW_RE.replace_all(markdown, |caps: &regex::Captures<'_>| {
            let index = blocks.len();
            blocks.push(PreviewBlock {
                source: caps[0].to_owned(),
                code: caps[1].trim().to_owned(),
            });
            placeholder(index)
        });
        (rewritten.into_owned(), Self { blocks })
    }

    /// Number of extracted blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no blocks were extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Swap placeholders in rendered `html` for the preview widgets.
    ///
    /// A placeholder that ended up inside a code span or fenced block was
    /// escaped by the renderer; it is restored to the original source text so
    /// that documentation about the syntax itself renders literally.
    pub fn post_process(&self, html: &mut String) {
        for (index, block) in self.blocks.iter().enumerate() {
            let marker = placeholder(index);
            if html.contains(&marker) {
                *html = html.replace(&marker, &widget(&block.code));
            }
            let escaped_marker = escape_html(&marker);
            if html.contains(&escaped_marker) {
                *html = html.replace(&escaped_marker, &escape_html(&block.source));
            }
        }
    }
}

/// Render the preview widget: live markup plus an escaped code view.
fn widget(code: &str) -> String {
    let mut out = String::with_capacity(code.len() * 2 + 400);
    out.push_str(r#"<div class="component-preview card">"#);
    out.push_str(r#"<div class="card-header"><h4 class="card-title">Preview</h4></div>"#);
    write!(
        out,
        r#"<div class="card-body"><div class="preview-output">{code}</div></div>"#
    )
    .unwrap();
    write!(
        out,
        r#"<div class="card-footer"><details><summary>View Code</summary><pre><code class="language-blade">{}</code></pre></details></div>"#,
        escape_html(code)
    )
    .unwrap();
    out.push_str("</div>");
    out
}

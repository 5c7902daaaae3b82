//! Markdown renderer for tabdoc documentation pages.
//!
//! This crate provides [`MarkdownRenderer`], which turns a markdown source into
//! an HTML body plus the metadata a documentation page needs:
//!
//! - the page title (first level-1 heading)
//! - a flat table of contents (levels 2 to 4)
//! - permalink anchors on every heading
//!
//! Before parsing, the literal `[TOC]` token is removed and `:::preview` blocks
//! are set aside; after rendering they are replaced by a preview widget holding
//! the live markup and its escaped source (see [`PreviewBlocks`]).
//!
//! # Example
//!
//! ```
//! use tabdoc_renderer::MarkdownRenderer;
//!
//! let result = MarkdownRenderer::new().render_markdown("# Button\n\n## Sizes\n\nSmall and large.");
//! assert_eq!(result.title.as_deref(), Some("Button"));
//! assert_eq!(result.toc[0].anchor_slug, "sizes");
//! ```

mod autolink;
mod html;
mod preview;
mod renderer;
mod state;
mod util;

pub use html::AlertKind;
pub use preview::PreviewBlocks;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{TocEntry, escape_html};
pub use util::{slugify, title_case};

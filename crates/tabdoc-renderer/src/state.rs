//! State structs that track context during event processing.

use std::collections::{HashMap, HashSet};

use pulldown_cmark::Alignment;

use crate::util::slugify;

/// Shallowest heading level listed in the table of contents.
const TOC_MIN_LEVEL: u8 = 2;
/// Deepest heading level listed in the table of contents.
const TOC_MAX_LEVEL: u8 = 4;

/// Anchor used when a heading's text has no sluggable characters.
const FALLBACK_ANCHOR: &str = "heading";

/// State for tracking code block rendering.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    /// Start a new code block with optional language.
    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the current code block and return (language, content).
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
}

impl TableState {
    /// Start a new table with column alignments.
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Get the alignment style for the current cell.
    pub(crate) fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// State for tracking image alt text capture.
#[derive(Default)]
pub(crate) struct ImageState {
    active: bool,
    alt_text: String,
}

impl ImageState {
    pub(crate) fn start(&mut self) {
        self.active = true;
        self.alt_text.clear();
    }

    /// End image capture and return the alt text.
    pub(crate) fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt_text)
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Table of contents entry.
///
/// `anchor_slug` equals the `id` of the rendered heading, so
/// `#{anchor_slug}` always scrolls to it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (2-4).
    pub level: u8,
    /// Heading text, trimmed.
    pub title: String,
    /// Anchor id of the heading.
    pub anchor_slug: String,
}

/// A heading that has been fully collected.
pub(crate) struct CompletedHeading {
    pub(crate) level: u8,
    pub(crate) id: String,
    pub(crate) html: String,
}

/// State for tracking headings, the page title and the table of contents.
#[derive(Default)]
pub(crate) struct HeadingState {
    title: Option<String>,
    /// Level of the heading being collected (None outside headings).
    current_level: Option<u8>,
    /// Plain text of the current heading (for title, slug and TOC).
    text: String,
    /// HTML of the current heading (with inline formatting).
    html: String,
    toc: Vec<TocEntry>,
    /// Next suffix to try for each base id.
    id_counts: HashMap<String, usize>,
    /// Every id handed out so far.
    issued_ids: HashSet<String>,
}

impl HeadingState {
    /// Check if we're currently inside a heading.
    pub(crate) fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    pub(crate) fn start_heading(&mut self, level: u8) {
        self.current_level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    /// Complete the current heading.
    ///
    /// Assigns a unique id, records the first non-empty H1 as title and adds levels
    /// 2-4 to the table of contents. Returns `None` outside a heading.
    pub(crate) fn complete_heading(&mut self) -> Option<CompletedHeading> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);
        let title = text.trim();

        let id = self.generate_id(title);

        if level == 1 && self.title.is_none() && !title.is_empty() {
            self.title = Some(title.to_owned());
        }

        if (TOC_MIN_LEVEL..=TOC_MAX_LEVEL).contains(&level) {
            self.toc.push(TocEntry {
                level,
                title: title.to_owned(),
                anchor_slug: id.clone(),
            });
        }

        Some(CompletedHeading { level, id, html })
    }

    /// Generate a unique ID for a heading: `faq`, then `faq-1`, `faq-2`, ...
    ///
    /// Suffixes already taken by another heading (`## Faq 1` slugs to
    /// `faq-1`) are skipped.
    fn generate_id(&mut self, text: &str) -> String {
        let mut base_id = slugify(text);
        if base_id.is_empty() {
            FALLBACK_ANCHOR.clone_into(&mut base_id);
        }

        let mut n = self.id_counts.get(&base_id).copied().unwrap_or(0);
        let mut id = if n == 0 {
            base_id.clone()
        } else {
            format!("{base_id}-{n}")
        };
        while self.issued_ids.contains(&id) {
            n += 1;
            id = format!("{base_id}-{n}");
        }

        self.id_counts.insert(base_id, n + 1);
        self.issued_ids.insert(id.clone());
        id
    }

    /// Append text to the plain-text buffer.
    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append HTML to the heading html buffer.
    pub(crate) fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub(crate) fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub(crate) fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

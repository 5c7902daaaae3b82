//! Navigation tree built from the content listing.
//!
//! Every directory becomes a [`NavigationNode::Directory`] and every markdown
//! file except `index` becomes a [`NavigationNode::File`]. Slugs are built
//! from [`slugify`]d base names joined with `/`; titles come from
//! [`title_case`].

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tabdoc_renderer::{slugify, title_case};
use tabdoc_storage::{Entry, Storage, StorageError};

/// Category of documents that are not inside any directory.
pub const DEFAULT_CATEGORY: &str = "General";

/// Local slug of landing documents, which are never listed.
const INDEX_SLUG: &str = "index";

/// One node of the navigation tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavigationNode {
    /// A directory with its nested nodes.
    Directory {
        title: String,
        slug: String,
        children: Vec<NavigationNode>,
    },
    /// A document.
    File {
        title: String,
        slug: String,
        /// Source file path relative to the content root.
        source_path: PathBuf,
    },
}

impl NavigationNode {
    /// Full slug (`parent/child`).
    #[must_use]
    pub fn slug(&self) -> &str {
        match self {
            Self::Directory { slug, .. } | Self::File { slug, .. } => slug,
        }
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Directory { title, .. } | Self::File { title, .. } => title,
        }
    }
}

/// The navigation tree of a documentation site.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    /// Top-level nodes in listing order.
    pub items: Vec<NavigationNode>,
}

impl Navigation {
    /// Scan `storage` and build the tree.
    pub fn load(storage: &dyn Storage) -> Result<Self, StorageError> {
        let entries = storage.scan()?;
        Ok(Self {
            items: build_navigation(&entries),
        })
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over file nodes in traversal order with their category.
    ///
    /// The category is the title of the immediate parent directory, or
    /// [`DEFAULT_CATEGORY`] for top-level files.
    #[must_use]
    pub fn files(&self) -> Files<'_> {
        Files {
            stack: vec![(self.items.iter(), DEFAULT_CATEGORY)],
        }
    }
}

/// Iterator returned by [`Navigation::files`].
pub struct Files<'a> {
    stack: Vec<(std::slice::Iter<'a, NavigationNode>, &'a str)>,
}

impl<'a> Iterator for Files<'a> {
    type Item = (&'a NavigationNode, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (iter, category) = self.stack.last_mut()?;
            let category = *category;
            match iter.next() {
                None => {
                    self.stack.pop();
                }
                Some(node @ NavigationNode::File { .. }) => return Some((node, category)),
                Some(NavigationNode::Directory {
                    title, children, ..
                }) => self.stack.push((children.iter(), title.as_str())),
            }
        }
    }
}

/// Build navigation nodes from a content listing.
///
/// Pure: the same entries always produce the same tree. When two siblings
/// map to the same slug the first one in listing order is kept.
#[must_use]
pub fn build_navigation(entries: &[Entry]) -> Vec<NavigationNode> {
    build_level(entries, "")
}

fn build_level(entries: &[Entry], prefix: &str) -> Vec<NavigationNode> {
    let mut nodes = Vec::with_capacity(entries.len());
    let mut seen = HashSet::new();

    for entry in entries {
        let local = slugify(entry.stem());
        if local.is_empty() {
            tracing::warn!(name = entry.name(), "skipping entry without a usable slug");
            continue;
        }
        if matches!(entry, Entry::File { .. }) && local == INDEX_SLUG {
            continue;
        }
        if !seen.insert(local.clone()) {
            tracing::warn!(
                name = entry.name(),
                slug = %local,
                prefix,
                "skipping entry whose slug collides with an earlier sibling"
            );
            continue;
        }

        let slug = if prefix.is_empty() {
            local
        } else {
            format!("{prefix}/{local}")
        };

        let node = match entry {
            Entry::Directory { name, children } => NavigationNode::Directory {
                title: title_case(name),
                children: build_level(children, &slug),
                slug,
            },
            Entry::File { path, .. } => NavigationNode::File {
                title: title_case(entry.stem()),
                slug,
                source_path: path.clone(),
            },
        };
        nodes.push(node);
    }

    nodes
}

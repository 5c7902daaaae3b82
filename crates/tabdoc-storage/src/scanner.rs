//! Content tree discovery by filesystem walking.
//!
//! The scanner only lists entries; no file content is read at this stage.
//! Symlinked directories are followed, guarded against cycles by comparing
//! canonical paths with the chain of directories currently being walked.

use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::Entry;

/// Nesting deeper than this is never walked.
const MAX_DEPTH: usize = 64;

/// Walks a content root and builds the ordered [`Entry`] tree.
pub(crate) struct Scanner<'a> {
    root: &'a Path,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(root: &'a Path) -> Self {
        Self { root }
    }

    /// Scan the root and return its ordered children.
    ///
    /// Returns an empty Vec if the root doesn't exist or isn't a directory.
    pub(crate) fn scan(&self) -> Vec<Entry> {
        if !self.root.is_dir() {
            return Vec::new();
        }
        let mut ancestors = Vec::new();
        if let Ok(canonical) = fs::canonicalize(self.root) {
            ancestors.push(canonical);
        }
        self.scan_directory(self.root, Path::new(""), &mut ancestors)
    }

    fn scan_directory(
        &self,
        dir_path: &Path,
        rel_prefix: &Path,
        ancestors: &mut Vec<PathBuf>,
    ) -> Vec<Entry> {
        let Ok(read_dir) = fs::read_dir(dir_path) else {
            tracing::warn!(path = %dir_path.display(), "cannot read directory, skipping");
            return Vec::new();
        };

        let mut directories = Vec::new();
        let mut files = Vec::new();

        for dir_entry in read_dir.filter_map(Result::ok) {
            let name = dir_entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let path = dir_entry.path();
            // Follows symlinks, so a linked directory is walked like a real one
            let Ok(metadata) = fs::metadata(&path) else {
                continue;
            };
            let rel_path = rel_prefix.join(&name);

            if metadata.is_dir() {
                if let Some(children) = self.descend(&path, &rel_path, ancestors) {
                    directories.push(Entry::Directory { name, children });
                }
            } else if metadata.is_file() && path.extension().is_some_and(|e| e == "md") {
                files.push(Entry::File {
                    name,
                    path: rel_path,
                });
            }
        }

        // Directories first, then files; byte-wise by name within each group
        directories.sort_by(|a, b| a.name().cmp(b.name()));
        files.sort_by(|a, b| a.name().cmp(b.name()));
        directories.extend(files);
        directories
    }

    /// Walk a child directory unless that would loop or exceed the depth limit.
    fn descend(
        &self,
        path: &Path,
        rel_path: &Path,
        ancestors: &mut Vec<PathBuf>,
    ) -> Option<Vec<Entry>> {
        if ancestors.len() >= MAX_DEPTH {
            tracing::warn!(
                path = %rel_path.display(),
                max_depth = MAX_DEPTH,
                "directory nesting too deep, skipping"
            );
            return None;
        }

        let canonical = fs::canonicalize(path).ok()?;
        if ancestors.contains(&canonical) {
            tracing::warn!(
                path = %rel_path.display(),
                target = %canonical.display(),
                "directory cycle detected, skipping"
            );
            return None;
        }

        ancestors.push(canonical);
        let children = self.scan_directory(path, rel_path, ancestors);
        ancestors.pop();
        Some(children)
    }
}

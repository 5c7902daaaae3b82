//! Cached access to navigation and documents.
//!
//! # Cache layout
//!
//! All entries live in the `docs` bucket:
//!
//! | Key          | Value                      |
//! |--------------|----------------------------|
//! | `navigation` | [`Navigation`] as JSON     |
//! | `doc:<slug>` | [`Document`] as JSON       |
//!
//! Only successful, present results are stored. Concurrent misses on the
//! same key may both rebuild; the last write wins.

use std::sync::Arc;

use tabdoc_cache::{Cache, CacheBucket, CacheBucketExt};
use tabdoc_renderer::{MarkdownRenderer, title_case};
use tabdoc_storage::Storage;

use crate::document::Document;
use crate::error::SiteError;
use crate::navigation::{Navigation, NavigationNode};

const BUCKET: &str = "docs";
const NAVIGATION_KEY: &str = "navigation";
/// Slug of the root landing document.
pub const INDEX_DOCUMENT: &str = "index";

fn document_key(slug: &str) -> String {
    format!("doc:{slug}")
}

/// Navigation and document access backed by a [`Storage`] and a [`Cache`].
pub struct DocumentationService {
    storage: Arc<dyn Storage>,
    bucket: Box<dyn CacheBucket>,
}

impl DocumentationService {
    /// Create a service reading from `storage` and caching in `cache`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, cache: &dyn Cache) -> Self {
        Self {
            storage,
            bucket: cache.bucket(BUCKET),
        }
    }

    /// Storage the service reads from.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Navigation tree, served from cache when fresh.
    pub fn navigation(&self) -> Result<Navigation, SiteError> {
        if let Some(navigation) = self.bucket.get_json::<Navigation>(NAVIGATION_KEY) {
            tracing::debug!("navigation cache hit");
            return Ok(navigation);
        }

        let navigation = Navigation::load(self.storage.as_ref())?;
        self.bucket.set_json(NAVIGATION_KEY, &navigation);
        Ok(navigation)
    }

    /// Document for `slug`, served from cache when fresh.
    ///
    /// Returns `Ok(None)` when no source resolves. Absent documents and
    /// failures are not cached.
    pub fn document(&self, slug: &str) -> Result<Option<Document>, SiteError> {
        let key = document_key(slug);
        if let Some(document) = self.bucket.get_json::<Document>(&key) {
            tracing::debug!(slug, "document cache hit");
            return Ok(Some(document));
        }

        let document = self.render_document(slug)?;
        if let Some(document) = &document {
            self.bucket.set_json(&key, document);
        }
        Ok(document)
    }

    /// Render the document for `slug` from its source, bypassing the cache.
    pub fn render_document(&self, slug: &str) -> Result<Option<Document>, SiteError> {
        if self.storage.resolve(slug).is_none() {
            tracing::debug!(slug, "no source for slug");
            return Ok(None);
        }

        let raw = self.storage.read(slug)?;
        let updated_at = self.storage.mtime(slug)?;

        let result = MarkdownRenderer::new().render_markdown(&raw);
        for warning in &result.warnings {
            tracing::warn!(slug, %warning, "render warning");
        }

        let title = result.title.unwrap_or_else(|| {
            let last_segment = slug.rsplit('/').next().unwrap_or(slug);
            title_case(last_segment)
        });

        Ok(Some(Document {
            slug: slug.to_owned(),
            title,
            html: result.html,
            raw,
            toc: result.toc,
            updated_at,
        }))
    }

    /// Drop every cached entry this service can address.
    ///
    /// Removes the navigation, rebuilds it from storage without caching, and
    /// removes the document entry of every file node. Index documents are
    /// never listed but can still be requested, so the root index and the
    /// index of every directory are removed too. Returns the number of
    /// document entries removed.
    pub fn invalidate_all(&self) -> Result<usize, SiteError> {
        self.bucket.remove(NAVIGATION_KEY);

        let navigation = Navigation::load(self.storage.as_ref())?;
        let mut slugs = vec![INDEX_DOCUMENT.to_owned()];
        collect_document_slugs(&navigation.items, &mut slugs);

        for slug in &slugs {
            self.bucket.remove(&document_key(slug));
        }
        let removed = slugs.len();

        tracing::info!(documents = removed, "documentation cache invalidated");
        Ok(removed)
    }
}

/// Slugs of every file node plus `<dir>/index` for every directory node.
fn collect_document_slugs(nodes: &[NavigationNode], slugs: &mut Vec<String>) {
    for node in nodes {
        match node {
            NavigationNode::File { slug, .. } => slugs.push(slug.clone()),
            NavigationNode::Directory { slug, children, .. } => {
                slugs.push(format!("{slug}/{INDEX_DOCUMENT}"));
                collect_document_slugs(children, slugs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tabdoc_cache::{MemoryCache, NullCache};
    use tabdoc_storage::MockStorage;

    use super::*;

    fn service_with(
        storage: MockStorage,
        cache: &dyn Cache,
    ) -> (Arc<MockStorage>, DocumentationService) {
        let storage = Arc::new(storage);
        let shared: Arc<dyn Storage> = Arc::<MockStorage>::clone(&storage);
        let service = DocumentationService::new(shared, cache);
        (storage, service)
    }

    #[test]
    fn test_render_document() {
        let storage = MockStorage::new()
            .with_file("forms/input.md", "# Input\n\n## Sizes\n\nText")
            .with_mtime("forms/input.md", 1_700_000_000);
        let (_, service) = service_with(storage, &NullCache);

        let document = service.document("forms/input").unwrap().unwrap();

        assert_eq!(document.slug, "forms/input");
        assert_eq!(document.title, "Input");
        assert_eq!(document.updated_at, 1_700_000_000);
        assert_eq!(document.toc.len(), 1);
        assert_eq!(document.toc[0].anchor_slug, "sizes");
        assert!(document.html.contains(r#"<h2 id="sizes">"#));
    }

    #[test]
    fn test_title_falls_back_to_last_segment() {
        let storage = MockStorage::new().with_file("forms/date_picker.md", "No heading here.");
        let (_, service) = service_with(storage, &NullCache);

        let document = service.document("forms/date-picker").unwrap().unwrap();
        assert_eq!(document.title, "Date Picker");
    }

    #[test]
    fn test_missing_document_is_none() {
        let (_, service) = service_with(MockStorage::new(), &NullCache);
        assert_eq!(service.document("nope").unwrap(), None);
        assert_eq!(service.document("../etc/passwd").unwrap(), None);
    }

    #[test]
    fn test_read_failure_after_resolution_is_error() {
        let storage = MockStorage::new()
            .with_file("secret.md", "# Secret")
            .with_read_error("secret.md");
        let (_, service) = service_with(storage, &NullCache);

        let err = service.document("secret").unwrap_err();
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_document_is_cached_until_invalidated() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let (storage, service) =
            service_with(MockStorage::new().with_file("button.md", "# Button"), &cache);

        assert_eq!(service.document("button").unwrap().unwrap().title, "Button");

        storage.set_file("button.md", "# Buttons");
        assert_eq!(service.document("button").unwrap().unwrap().title, "Button");

        service.invalidate_all().unwrap();
        assert_eq!(service.document("button").unwrap().unwrap().title, "Buttons");
    }

    #[test]
    fn test_absent_document_not_cached() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let (storage, service) = service_with(MockStorage::new(), &cache);

        assert_eq!(service.document("alert").unwrap(), None);

        storage.set_file("alert.md", "# Alert");
        assert_eq!(service.document("alert").unwrap().unwrap().title, "Alert");
    }

    #[test]
    fn test_navigation_cached_until_invalidated() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let (storage, service) =
            service_with(MockStorage::new().with_file("button.md", "# Button"), &cache);

        assert_eq!(service.navigation().unwrap().items.len(), 1);

        storage.set_file("card.md", "# Card");
        assert_eq!(service.navigation().unwrap().items.len(), 1);

        service.invalidate_all().unwrap();
        assert_eq!(service.navigation().unwrap().items.len(), 2);
    }

    #[test]
    fn test_invalidate_all_removes_index_document() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let (storage, service) =
            service_with(MockStorage::new().with_file("index.md", "# Welcome"), &cache);

        assert_eq!(service.document("index").unwrap().unwrap().title, "Welcome");
        storage.set_file("index.md", "# Hello");

        let removed = service.invalidate_all().unwrap();
        assert_eq!(removed, 1);
        assert_eq!(service.document("index").unwrap().unwrap().title, "Hello");
    }

    #[test]
    fn test_invalidate_all_removes_directory_index_documents() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let (storage, service) = service_with(
            MockStorage::new()
                .with_file("forms/index.md", "# Forms")
                .with_file("forms/input.md", "# Input"),
            &cache,
        );

        assert_eq!(service.document("forms/index").unwrap().unwrap().title, "Forms");
        storage.set_file("forms/index.md", "# Form Controls");
        assert_eq!(service.document("forms/index").unwrap().unwrap().title, "Forms");

        service.invalidate_all().unwrap();
        assert_eq!(
            service.document("forms/index").unwrap().unwrap().title,
            "Form Controls"
        );
    }

    #[test]
    fn test_empty_h1_falls_back_to_slug_title() {
        let storage = MockStorage::new().with_file("forms/date_picker.md", "#\n\nBody");
        let (_, service) = service_with(storage, &NullCache);

        let document = service.document("forms/date-picker").unwrap().unwrap();
        assert_eq!(document.title, "Date Picker");
    }

    #[test]
    fn test_invalidate_all_counts_documents() {
        let storage = MockStorage::new()
            .with_file("a.md", "")
            .with_file("group/b.md", "")
            .with_file("group/index.md", "");
        let (_, service) = service_with(storage, &NullCache);

        // a, group/b, index, group/index
        assert_eq!(service.invalidate_all().unwrap(), 4);
    }
}

//! End-to-end tests over a real content directory.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tabdoc_cache::{FileCache, MemoryCache, NullCache};
use tabdoc_site::{DocumentationService, NavigationNode};
use tabdoc_storage::FsStorage;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture() -> tempfile::TempDir {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    write(root, "index.md", "# Components\n\nWelcome.");
    write(root, "button.md", "# Button\n\n## Sizes\n\n## Colors\n");
    write(
        root,
        "forms/input.md",
        "# Input\n\n[TOC]\n\n## Basic Usage\n\n:::preview\n<x-input name=\"email\" />\n:::\n\n### Labels\n",
    );
    write(root, "forms/date_picker.md", "Pick a date.");
    write(root, "forms/index.md", "# Forms");
    write(root, "forms/.draft.md", "# Hidden");
    write(root, "forms/notes.txt", "not markdown");
    temp
}

fn service(root: &Path) -> DocumentationService {
    DocumentationService::new(Arc::new(FsStorage::new(root.to_path_buf())), &NullCache)
}

#[test]
fn test_navigation_tree() {
    let temp = fixture();
    let navigation = service(temp.path()).navigation().unwrap();

    let slugs: Vec<&str> = navigation.files().map(|(node, _)| node.slug()).collect();
    assert_eq!(slugs, vec!["forms/date-picker", "forms/input", "button"]);

    let NavigationNode::Directory { title, slug, .. } = &navigation.items[0] else {
        panic!("expected directory first");
    };
    assert_eq!(title, "Forms");
    assert_eq!(slug, "forms");
}

#[test]
fn test_navigation_has_no_index_files() {
    let temp = fixture();
    let navigation = service(temp.path()).navigation().unwrap();

    assert!(
        navigation
            .files()
            .all(|(node, _)| !node.slug().ends_with("index"))
    );
}

#[test]
fn test_forms_input_end_to_end() {
    let temp = fixture();
    let document = service(temp.path()).document("forms/input").unwrap().unwrap();

    assert_eq!(document.title, "Input");
    let toc: Vec<(u8, &str, &str)> = document
        .toc
        .iter()
        .map(|e| (e.level, e.title.as_str(), e.anchor_slug.as_str()))
        .collect();
    assert_eq!(
        toc,
        vec![(2, "Basic Usage", "basic-usage"), (3, "Labels", "labels")]
    );
    assert!(document.html.contains(r#"<h2 id="basic-usage">"#));
    assert!(
        document
            .html
            .contains(r#"<div class="preview-output"><x-input name="email" /></div>"#)
    );
    assert!(!document.html.contains("[TOC]"));
    assert!(document.raw.contains(":::preview"));
    assert!(document.updated_at > 0);
}

#[test]
fn test_underscore_fallback_resolution() {
    let temp = fixture();
    let document = service(temp.path())
        .document("forms/date-picker")
        .unwrap()
        .unwrap();

    assert_eq!(document.title, "Date Picker");
}

#[test]
fn test_root_index_document() {
    let temp = fixture();
    let document = service(temp.path()).document("index").unwrap().unwrap();
    assert_eq!(document.title, "Components");
}

#[test]
fn test_missing_content_root() {
    let temp = tempfile::tempdir().unwrap();
    let service = service(&temp.path().join("missing"));

    assert!(service.navigation().unwrap().is_empty());
    assert_eq!(service.document("button").unwrap(), None);
}

#[test]
fn test_invalidation_recomputes_with_file_cache() {
    let temp = fixture();
    let cache_dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(
        cache_dir.path().to_path_buf(),
        "1.0.0",
        Duration::from_secs(3600),
    );
    let storage = Arc::new(FsStorage::new(temp.path().to_path_buf()));
    let service = DocumentationService::new(storage, &cache);

    assert_eq!(service.document("button").unwrap().unwrap().toc.len(), 2);
    assert_eq!(service.navigation().unwrap().items.len(), 2);
    write(temp.path(), "button.md", "# Button\n\n## Sizes\n");
    write(temp.path(), "alert.md", "# Alert");

    // Stale until invalidated
    assert_eq!(service.document("button").unwrap().unwrap().toc.len(), 2);
    assert_eq!(service.navigation().unwrap().items.len(), 2);

    service.invalidate_all().unwrap();

    assert_eq!(service.document("button").unwrap().unwrap().toc.len(), 1);
    assert_eq!(service.navigation().unwrap().items.len(), 3);
}

#[test]
fn test_expired_entries_are_rebuilt() {
    let temp = fixture();
    let cache = MemoryCache::new(Duration::ZERO);
    let storage = Arc::new(FsStorage::new(temp.path().to_path_buf()));
    let service = DocumentationService::new(storage, &cache);

    assert_eq!(service.document("button").unwrap().unwrap().title, "Button");
    write(temp.path(), "button.md", "# Buttons");
    assert_eq!(service.document("button").unwrap().unwrap().title, "Buttons");
}

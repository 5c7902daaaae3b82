//! CLI command implementations.

pub(crate) mod cache;
pub(crate) mod flush;
pub(crate) mod index;
pub(crate) mod serve;

use std::path::Path;
use std::sync::Arc;

use tabdoc_cache::{Cache, FileCache, MemoryCache, NullCache};
use tabdoc_config::{CacheBackend, Config, SearchConfig};
use tabdoc_search::MeilisearchClient;
use tabdoc_site::DocumentationService;
use tabdoc_storage::{FsStorage, Storage};

use crate::error::CliError;

pub(crate) use cache::CacheCommand;
pub(crate) use flush::FlushArgs;
pub(crate) use index::IndexArgs;
pub(crate) use serve::ServeArgs;

/// Build the configured cache.
///
/// The file cache is keyed by `version`, so entries written by another
/// release are never read back.
pub(crate) fn build_cache(config: &Config, version: &str) -> Result<Box<dyn Cache>, CliError> {
    let ttl = config.cache.ttl();
    let cache: Box<dyn Cache> = match config.cache.backend {
        CacheBackend::File => {
            ensure_project_dir(&config.docs_resolved.project_dir)?;
            Box::new(FileCache::new(
                config.docs_resolved.cache_dir(),
                version,
                ttl,
            ))
        }
        CacheBackend::Memory => Box::new(MemoryCache::new(ttl)),
        CacheBackend::None => Box::new(NullCache),
    };
    Ok(cache)
}

/// Documentation service over the configured source directory and cache.
pub(crate) fn documentation_service(
    config: &Config,
    version: &str,
) -> Result<DocumentationService, CliError> {
    let storage: Arc<dyn Storage> =
        Arc::new(FsStorage::new(config.docs_resolved.source_dir.clone()));
    let cache = build_cache(config, version)?;
    Ok(DocumentationService::new(storage, cache.as_ref()))
}

/// Meilisearch client for the `[search]` section.
pub(crate) fn search_client(search: &SearchConfig) -> MeilisearchClient {
    MeilisearchClient::new(
        &search.url,
        &search.index,
        search.api_key.as_deref(),
        search.timeout,
    )
}

/// Ensure the `.tabdoc/` project directory exists with a `.gitignore`.
fn ensure_project_dir(project_dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(project_dir)?;

    let gitignore_path = project_dir.join(".gitignore");
    if !gitignore_path.exists() {
        let _ = std::fs::write(&gitignore_path, "# Automatically created by tabdoc\n*\n");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tabdoc_config::CliSettings;

    use super::*;

    fn load(dir: &Path, toml: &str) -> Config {
        let path = dir.join("tabdoc.toml");
        std::fs::write(&path, toml).unwrap();
        Config::load(Some(&path), None).unwrap()
    }

    #[test]
    fn test_ensure_project_dir_writes_gitignore() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join(".tabdoc");

        ensure_project_dir(&project).unwrap();

        let gitignore = std::fs::read_to_string(project.join(".gitignore")).unwrap();
        assert!(gitignore.ends_with("*\n"));
    }

    #[test]
    fn test_file_backend_creates_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(dir.path(), "[cache]\nbackend = \"file\"\n");

        build_cache(&config, "1.0.0").unwrap();

        assert!(config.docs_resolved.project_dir.join(".gitignore").exists());
    }

    #[test]
    fn test_no_cache_flag_skips_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tabdoc.toml");
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            cache_enabled: Some(false),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        build_cache(&config, "1.0.0").unwrap();

        assert!(!config.docs_resolved.project_dir.exists());
    }

    #[test]
    fn test_documentation_service_reads_source_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/button.md"), "# Button").unwrap();
        let config = load(dir.path(), "[cache]\nbackend = \"memory\"\n");

        let service = documentation_service(&config, "1.0.0").unwrap();
        let document = service.document("button").unwrap().unwrap();

        assert_eq!(document.title, "Button");
    }
}

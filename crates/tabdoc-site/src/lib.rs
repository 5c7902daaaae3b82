//! Navigation and documents for a tabdoc site.
//!
//! This crate provides:
//! - [`Navigation`]: the tree of directories and documents built from a
//!   content listing
//! - [`Document`]: a rendered page with title and table of contents
//! - [`DocumentationService`]: cached access to both, with wholesale
//!   invalidation
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use tabdoc_cache::NullCache;
//! use tabdoc_site::DocumentationService;
//! use tabdoc_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("docs")));
//! let service = DocumentationService::new(storage, &NullCache);
//!
//! let navigation = service.navigation()?;
//! if let Some(document) = service.document("forms/input")? {
//!     println!("{}", document.title);
//! }
//! # Ok(())
//! # }
//! ```

mod document;
mod error;
mod navigation;
mod service;

pub use document::Document;
pub use error::SiteError;
pub use navigation::{DEFAULT_CATEGORY, Files, Navigation, NavigationNode, build_navigation};
pub use service::{DocumentationService, INDEX_DOCUMENT};

// Re-export TocEntry from tabdoc-renderer for convenience
pub use tabdoc_renderer::TocEntry;

//! Content store for tabdoc.
//!
//! This crate provides a [`Storage`] trait for abstracting how markdown sources
//! are listed and read. Consumers (navigation, rendering, search) work in terms
//! of slugs and never touch the filesystem directly.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `scan()`, `resolve()`, `read()`, and `mtime()` methods
//! - [`FsStorage`] implementation rooted at a content directory
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Slugs
//!
//! A slug is a `/`-separated path relative to the content root without the
//! `.md` extension, e.g. `button` or `forms/input`. A slug resolves to the
//! first existing candidate of:
//!
//! 1. `<root>/<slug>.md`
//! 2. `<root>/<slug with '-' replaced by '_'>.md`
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use tabdoc_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("resources/docs"));
//! let tree = storage.scan()?;
//! let source = storage.read("forms/input")?;
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod scanner;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Entry, Storage, StorageError, StorageErrorKind, slug_candidates};

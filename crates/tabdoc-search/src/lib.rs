//! Search for tabdoc documentation.
//!
//! [`SearchService`] asks an external engine ([`MeilisearchClient`]) first
//! and answers with [`LocalSearch`] when the engine is missing or fails.
//! Results carry a short excerpt built by [`highlighted_excerpt`] (engine
//! hits) or [`query_excerpt`] (local hits).
//!
//! The index itself is fed with [`IndexRecord`]s produced by
//! [`collect_records`].

mod backend;
mod error;
mod excerpt;
mod local;
mod meilisearch;
mod record;
mod result;
mod service;

pub use backend::{FormattedHit, SearchBackend, SearchHit};
pub use error::SearchError;
pub use excerpt::{highlighted_excerpt, limit, query_excerpt, strip_tags};
pub use local::LocalSearch;
pub use meilisearch::{DEFAULT_TIMEOUT, EnqueuedTask, MeilisearchClient};
pub use record::{IndexRecord, collect_records, record_id, strip_markdown};
pub use result::SearchResult;
pub use service::{MIN_QUERY_CHARS, SearchService};

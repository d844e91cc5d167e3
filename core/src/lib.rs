//! Synchronous client for the Wikimedia Core REST API.
//!
//! # Overview
//! Fetches pages, revisions, files and search results from a Wikimedia
//! project (`WIKIPEDIA`, `WIKTIONARY`, `COMMONS`, ...) in the project's
//! configured language. Requests are anonymous GETs against
//! `https://api.wikimedia.org/core/v1/<project>[/<language>]/...`.
//!
//! ```no_run
//! use wikimedia_core::{PageMode, WikiClient, WIKIPEDIA};
//!
//! let client = WikiClient::default();
//! let page = client.fetch_page(&WIKIPEDIA, "Earth", PageMode::Bare)?;
//! let history = client.page_history(&page, &Default::default())?;
//! println!("{} has {} recent revisions", page.title, history.len());
//! # Ok::<(), wikimedia_core::ApiError>(())
//! ```
//!
//! # Design
//! - `Project` values are immutable; the named projects are constants and a
//!   different language is a derived copy.
//! - `WikiClient` is stateless beyond its base URL and transport. Every
//!   endpoint has a `build_*` (request) / `parse_*` (response) pair, so the
//!   I/O boundary is explicit and testable without a network.
//! - `endpoint::resolve` is the only place URLs are composed.
//! - Every failure is an `ApiError` naming the operation that failed.

pub mod client;
mod decode;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod project;
pub mod types;

pub use client::{WikiClient, DEFAULT_BASE_URL};
pub use error::{ApiError, Operation, TransportError};
pub use http::{HttpRequest, HttpResponse, Transport, UreqTransport};
pub use project::{
    Language, Project, ProjectKind, COMMONS, WIKIBOOKS, WIKINEWS, WIKIPEDIA, WIKIQUOTE,
    WIKISOURCE, WIKISPECIES, WIKIVERSITY, WIKIVOYAGE, WIKTIONARY,
};
pub use types::{
    File, FileArtifact, FileLatest, FileUser, HistoryQuery, LatestRevision, License, MediaType,
    Page, PageBody, PageLanguage, PageMode, PageRevision, RevisionFilter, RevisionPage,
    RevisionUser, SearchResult, SearchThumbnail, SearchType,
};

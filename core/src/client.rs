//! Request builder, response parser and blocking operations for the
//! Wikimedia Core REST API.
//!
//! # Design
//! `WikiClient` holds a base URL and a `Transport` and carries no state
//! between calls. Each endpoint is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`; the operation method (`fetch_page`, `search`, ...) runs
//! build, transport and parse in sequence. Callers with their own HTTP stack
//! can use the build/parse pairs directly.

use serde::de::DeserializeOwned;
use url::Url;

use crate::decode::{decode, decode_error, decode_wrapped};
use crate::endpoint::{resolve, with_query};
use crate::error::{ApiError, Operation};
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::project::Project;
use crate::types::{
    File, HistoryQuery, Page, PageLanguage, PageMode, PageRecord, PageRevision, SearchResult,
    SearchType,
};

/// Production host of the Wikimedia API.
pub const DEFAULT_BASE_URL: &str = "https://api.wikimedia.org";

/// Synchronous client for the Wikimedia Core REST API.
#[derive(Debug, Clone)]
pub struct WikiClient<T = UreqTransport> {
    base_url: Url,
    transport: T,
}

impl WikiClient<UreqTransport> {
    /// A client for `base_url` using the default ureq transport.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_transport(base_url, UreqTransport::new())
    }
}

impl Default for WikiClient<UreqTransport> {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            transport: UreqTransport::new(),
        }
    }
}

impl<T: Transport> WikiClient<T> {
    /// A client for `base_url` sending requests through `transport`.
    pub fn with_transport(base_url: &str, transport: T) -> Result<Self, ApiError> {
        let invalid = |message: String| ApiError::InvalidArgument {
            operation: Operation::Configure,
            message,
        };
        let base_url = Url::parse(base_url).map_err(|e| invalid(format!("invalid base URL {base_url:?}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(invalid(format!("base URL must be http(s): {base_url}")));
        }
        Ok(Self { base_url, transport })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn request(&self, operation: Operation, project: &Project, endpoint: &str) -> HttpRequest {
        HttpRequest {
            operation,
            url: resolve(&self.base_url, project, endpoint),
        }
    }

    /// Send `request` and hand the response to `parse`.
    fn execute<R>(
        &self,
        request: HttpRequest,
        parse: impl FnOnce(&HttpRequest, &HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        tracing::debug!(operation = %request.operation, url = %request.url, "sending request");
        let response = self
            .transport
            .execute(&request)
            .map_err(|source| ApiError::Transport {
                operation: request.operation,
                url: request.url.to_string(),
                source,
            })?;
        tracing::debug!(operation = %request.operation, status = response.status, "received response");
        parse(&request, &response)
    }

    // -----------------------------------------------------------------------
    // Pages
    // -----------------------------------------------------------------------

    pub fn build_fetch_page(&self, project: &Project, title: &str, mode: PageMode) -> HttpRequest {
        let endpoint = match mode {
            PageMode::Bare => format!("/page/{title}/bare"),
            PageMode::Html => format!("/page/{title}/with_html"),
            PageMode::Source => format!("/page/{title}"),
        };
        self.request(Operation::FetchPage, project, &endpoint)
    }

    pub fn parse_fetch_page(
        &self,
        project: &Project,
        mode: PageMode,
        request: &HttpRequest,
        response: &HttpResponse,
    ) -> Result<Page, ApiError> {
        let record: PageRecord = decode(request, response)?;
        record
            .into_page(project.clone(), mode)
            .map_err(|source| decode_error(request, response, source))
    }

    /// Fetch a page by title. `mode` selects whether HTML, source or no
    /// content comes back with the metadata.
    pub fn fetch_page(&self, project: &Project, title: &str, mode: PageMode) -> Result<Page, ApiError> {
        let request = self.build_fetch_page(project, title, mode);
        self.execute(request, |req, resp| self.parse_fetch_page(project, mode, req, resp))
    }

    pub fn build_page_languages(&self, page: &Page) -> HttpRequest {
        let endpoint = format!("/page/{}/links/language", page.key);
        self.request(Operation::PageLanguages, &page.project, &endpoint)
    }

    pub fn parse_page_languages(
        &self,
        request: &HttpRequest,
        response: &HttpResponse,
    ) -> Result<Vec<PageLanguage>, ApiError> {
        decode(request, response)
    }

    /// Language editions in which `page` is available.
    pub fn page_languages(&self, page: &Page) -> Result<Vec<PageLanguage>, ApiError> {
        let request = self.build_page_languages(page);
        self.execute(request, |req, resp| self.parse_page_languages(req, resp))
    }

    pub fn build_page_files(&self, page: &Page) -> HttpRequest {
        let endpoint = format!("/page/{}/links/media", page.key);
        self.request(Operation::PageFiles, &page.project, &endpoint)
    }

    pub fn parse_page_files(&self, request: &HttpRequest, response: &HttpResponse) -> Result<Vec<File>, ApiError> {
        decode_wrapped(request, response, "files")
    }

    /// Files used on `page`. Thumbnails are not included.
    pub fn page_files(&self, page: &Page) -> Result<Vec<File>, ApiError> {
        let request = self.build_page_files(page);
        self.execute(request, |req, resp| self.parse_page_files(req, resp))
    }

    /// Build a history request. Fails without building anything when both
    /// `older_than` and `newer_than` are set.
    pub fn build_page_history(&self, page: &Page, query: &HistoryQuery) -> Result<HttpRequest, ApiError> {
        if query.older_than.is_some() && query.newer_than.is_some() {
            return Err(ApiError::InvalidArgument {
                operation: Operation::PageHistory,
                message: "older_than and newer_than cannot both be specified".to_string(),
            });
        }

        let mut params = Vec::new();
        if let Some(filter) = query.filter.as_param() {
            params.push(("filter", filter.to_string()));
        }
        if let Some(id) = query.older_than {
            params.push(("older_than", id.to_string()));
        }
        if let Some(id) = query.newer_than {
            params.push(("newer_than", id.to_string()));
        }
        let endpoint = with_query(&format!("/page/{}/history", page.key), params);
        Ok(self.request(Operation::PageHistory, &page.project, &endpoint))
    }

    pub fn parse_page_history(
        &self,
        request: &HttpRequest,
        response: &HttpResponse,
    ) -> Result<Vec<PageRevision>, ApiError> {
        decode_wrapped(request, response, "revisions")
    }

    /// Up to 20 revisions of `page`, bounded and filtered by `query`.
    pub fn page_history(&self, page: &Page, query: &HistoryQuery) -> Result<Vec<PageRevision>, ApiError> {
        let request = self.build_page_history(page, query)?;
        self.execute(request, |req, resp| self.parse_page_history(req, resp))
    }

    // -----------------------------------------------------------------------
    // Revisions
    // -----------------------------------------------------------------------

    pub fn build_fetch_revision(&self, project: &Project, id: u64) -> HttpRequest {
        self.request(Operation::FetchRevision, project, &format!("/revision/{id}/bare"))
    }

    pub fn parse_fetch_revision(&self, request: &HttpRequest, response: &HttpResponse) -> Result<PageRevision, ApiError> {
        decode(request, response)
    }

    pub fn fetch_revision(&self, project: &Project, id: u64) -> Result<PageRevision, ApiError> {
        let request = self.build_fetch_revision(project, id);
        self.execute(request, |req, resp| self.parse_fetch_revision(req, resp))
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Build a search request. With `limit` unset the server default applies;
    /// any given value is sent as-is.
    pub fn build_search(
        &self,
        project: &Project,
        query: &str,
        search_type: SearchType,
        limit: Option<u32>,
    ) -> HttpRequest {
        let path = match search_type {
            SearchType::Content => "/search/page",
            SearchType::Titles => "/search/title",
        };
        let mut params = vec![("q", query.to_string())];
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        self.request(Operation::Search, project, &with_query(path, params))
    }

    pub fn parse_search(&self, request: &HttpRequest, response: &HttpResponse) -> Result<Vec<SearchResult>, ApiError> {
        decode_wrapped(request, response, "pages")
    }

    pub fn search(
        &self,
        project: &Project,
        query: &str,
        search_type: SearchType,
        limit: Option<u32>,
    ) -> Result<Vec<SearchResult>, ApiError> {
        let request = self.build_search(project, query, search_type, limit);
        self.execute(request, |req, resp| self.parse_search(req, resp))
    }

    // -----------------------------------------------------------------------
    // Files
    // -----------------------------------------------------------------------

    pub fn build_fetch_file(&self, project: &Project, title: &str) -> HttpRequest {
        self.request(Operation::FetchFile, project, &format!("/file/{title}"))
    }

    pub fn parse_fetch_file(&self, request: &HttpRequest, response: &HttpResponse) -> Result<File, ApiError> {
        decode(request, response)
    }

    pub fn fetch_file(&self, project: &Project, title: &str) -> Result<File, ApiError> {
        let request = self.build_fetch_file(project, title);
        self.execute(request, |req, resp| self.parse_fetch_file(req, resp))
    }

    /// Send an arbitrary GET to `endpoint` under `project` and decode the
    /// body as `R`. For endpoints without a dedicated method.
    pub fn get<R: DeserializeOwned>(
        &self,
        operation: Operation,
        project: &Project,
        endpoint: &str,
    ) -> Result<R, ApiError> {
        let request = self.request(operation, project, endpoint);
        self.execute(request, |req, resp| decode(req, resp))
    }
}

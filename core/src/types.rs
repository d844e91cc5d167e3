//! Typed results of the Core REST API.
//!
//! # Design
//! Fields the API may return as `null` or omit are `Option`s, so "unknown"
//! never collapses into zero. Fields whose shape varies between responses
//! (`matched_title`, thumbnail `size`/`duration` in search results) are kept
//! as raw `serde_json::Value`s. `Page` is not deserialized directly: its body
//! depends on the fetch mode and it carries the `Project` it came from, so
//! the client assembles it from a `PageRecord`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::project::Project;

/// Which content a page fetch returns alongside the metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageMode {
    /// Metadata only.
    Bare,
    /// Metadata plus rendered HTML.
    Html,
    /// Metadata plus source in the page's content model.
    #[default]
    Source,
}

/// Content of a fetched page, matching the `PageMode` it was fetched with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
    None,
    Html(String),
    Source(String),
}

/// Summary of the latest revision of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestRevision {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
}

/// License of a wiki's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub url: String,
    pub title: String,
}

/// A wiki page and its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// The wiki this page was fetched from.
    pub project: Project,
    pub id: u64,
    /// Title in URL-friendly form.
    pub key: String,
    pub title: String,
    pub latest: LatestRevision,
    /// `wikitext`, `css`, `javascript`, `json` or `text`.
    pub content_model: String,
    pub license: License,
    pub body: PageBody,
}

impl Page {
    pub fn html(&self) -> Option<&str> {
        match &self.body {
            PageBody::Html(html) => Some(html),
            _ => None,
        }
    }

    pub fn source(&self) -> Option<&str> {
        match &self.body {
            PageBody::Source(source) => Some(source),
            _ => None,
        }
    }
}

/// Wire shape of a page response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PageRecord {
    pub id: u64,
    pub key: String,
    pub title: String,
    pub latest: LatestRevision,
    pub content_model: String,
    pub license: License,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl PageRecord {
    /// Assemble a `Page`, taking the body the mode asked for. A missing body
    /// field is reported the same way serde reports any missing field.
    pub fn into_page(self, project: Project, mode: PageMode) -> Result<Page, serde_json::Error> {
        use serde::de::Error as _;

        let body = match mode {
            PageMode::Bare => PageBody::None,
            PageMode::Html => PageBody::Html(
                self.html
                    .ok_or_else(|| serde_json::Error::missing_field("html"))?,
            ),
            PageMode::Source => PageBody::Source(
                self.source
                    .ok_or_else(|| serde_json::Error::missing_field("source"))?,
            ),
        };
        Ok(Page {
            project,
            id: self.id,
            key: self.key,
            title: self.title,
            latest: self.latest,
            content_model: self.content_model,
            license: self.license,
            body,
        })
    }
}

/// A language edition in which a page is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLanguage {
    pub code: String,
    pub name: String,
    pub key: String,
    pub title: String,
}

/// Which revisions a history query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevisionFilter {
    #[default]
    None,
    /// Revisions that revert an earlier edit.
    Reverted,
    /// Revisions by anonymous users.
    Anonymous,
    /// Revisions by bots.
    Bot,
    /// Revisions marked as minor edits.
    Minor,
}

impl RevisionFilter {
    /// The `filter` query value, or `None` when no filtering applies.
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            RevisionFilter::None => None,
            RevisionFilter::Reverted => Some("reverted"),
            RevisionFilter::Anonymous => Some("anonymous"),
            RevisionFilter::Bot => Some("bot"),
            RevisionFilter::Minor => Some("minor"),
        }
    }

    /// Parse a filter name. Unrecognised names mean no filtering.
    pub fn from_name(name: &str) -> Self {
        match name {
            "reverted" => RevisionFilter::Reverted,
            "anonymous" => RevisionFilter::Anonymous,
            "bot" => RevisionFilter::Bot,
            "minor" => RevisionFilter::Minor,
            "" | "none" => RevisionFilter::None,
            other => {
                tracing::warn!(filter = other, "unrecognised revision filter, ignoring");
                RevisionFilter::None
            }
        }
    }
}

/// Bounds and filter for a page history query.
///
/// `older_than` and `newer_than` are revision ids and are mutually
/// exclusive. With neither set the latest revisions are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryQuery {
    pub older_than: Option<u64>,
    pub newer_than: Option<u64>,
    pub filter: RevisionFilter,
}

impl HistoryQuery {
    pub fn latest() -> Self {
        Self::default()
    }

    pub fn older_than(id: u64) -> Self {
        Self {
            older_than: Some(id),
            ..Self::default()
        }
    }

    pub fn newer_than(id: u64) -> Self {
        Self {
            newer_than: Some(id),
            ..Self::default()
        }
    }

    pub fn filter(self, filter: RevisionFilter) -> Self {
        Self { filter, ..self }
    }
}

/// The page a revision belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionPage {
    pub id: u64,
    pub title: String,
}

/// The editor of a revision. Anonymous editors have no name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionUser {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A single change to a wiki page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRevision {
    pub id: u64,
    /// Only present when fetched by revision id.
    #[serde(default)]
    pub page: Option<RevisionPage>,
    /// Size of the revision in bytes.
    pub size: u64,
    pub minor: bool,
    pub timestamp: DateTime<Utc>,
    pub user: RevisionUser,
    #[serde(default)]
    pub comment: Option<String>,
    /// Bytes changed relative to the preceding revision, if known.
    #[serde(default)]
    pub delta: Option<i64>,
}

impl PageRevision {
    pub fn is_anonymous(&self) -> bool {
        self.user.name.is_none()
    }
}

/// Broad media classification of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaType {
    Bitmap,
    Drawing,
    Audio,
    Video,
    Multimedia,
    Office,
    Text,
    Executable,
    Archive,
    #[serde(rename = "3D")]
    ThreeD,
    #[serde(other)]
    Unknown,
}

/// One rendition of a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileArtifact {
    pub mediatype: MediaType,
    /// Size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
    /// Maximum recommended width in pixels.
    #[serde(default)]
    pub width: Option<u32>,
    /// Maximum recommended height in pixels.
    #[serde(default)]
    pub height: Option<u32>,
    /// Length in seconds, for time-based media only.
    #[serde(default)]
    pub duration: Option<f64>,
    pub url: String,
}

/// The user who uploaded a file revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUser {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Summary of the latest revision of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLatest {
    pub timestamp: DateTime<Utc>,
    pub user: FileUser,
}

/// A file uploaded to a wiki.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub title: String,
    /// Page describing the file, with license and other metadata.
    #[serde(default)]
    pub file_description_url: Option<String>,
    #[serde(default)]
    pub latest: Option<FileLatest>,
    #[serde(default)]
    pub preferred: Option<FileArtifact>,
    #[serde(default)]
    pub original: Option<FileArtifact>,
    /// Only present when fetched with `fetch_file`.
    #[serde(default)]
    pub thumbnail: Option<FileArtifact>,
}

/// Search endpoint to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    /// Full-text search over page content.
    #[default]
    Content,
    /// Pages whose titles begin with the query.
    Titles,
}

/// Thumbnail attached to a search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchThumbnail {
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub size: serde_json::Value,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub duration: serde_json::Value,
    pub url: String,
}

/// A page matching a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub matched_title: serde_json::Value,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<SearchThumbnail>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::WIKIPEDIA;

    const PAGE: &str = r#"{
        "id": 9228,
        "key": "Earth",
        "title": "Earth",
        "latest": {"id": 1185522940, "timestamp": "2023-11-16T08:13:25Z"},
        "content_model": "wikitext",
        "license": {"url": "https://creativecommons.org/licenses/by-sa/4.0/", "title": "Creative Commons Attribution-Share Alike 4.0"},
        "html_url": "https://api.wikimedia.org/core/v1/wikipedia/en/page/Earth/html"
    }"#;

    #[test]
    fn bare_page_has_no_body() {
        let record: PageRecord = serde_json::from_str(PAGE).unwrap();
        let page = record.into_page(WIKIPEDIA, PageMode::Bare).unwrap();
        assert_eq!(page.title, "Earth");
        assert_eq!(page.id, 9228);
        assert_eq!(page.body, PageBody::None);
        assert!(page.html().is_none());
        assert!(page.source().is_none());
        assert_eq!(page.project, WIKIPEDIA);
        assert_eq!(page.latest.timestamp.to_rfc3339(), "2023-11-16T08:13:25+00:00");
    }

    #[test]
    fn html_mode_requires_html_field() {
        let record: PageRecord = serde_json::from_str(PAGE).unwrap();
        let err = record.into_page(WIKIPEDIA, PageMode::Html).unwrap_err();
        assert!(err.to_string().contains("html"), "{err}");
    }

    #[test]
    fn source_mode_takes_source_only() {
        let json = PAGE.replacen("\"id\": 9228,", "\"id\": 9228, \"source\": \"'''Earth''' is\", \"html\": \"<p>x</p>\",", 1);
        let record: PageRecord = serde_json::from_str(&json).unwrap();
        let page = record.into_page(WIKIPEDIA, PageMode::Source).unwrap();
        assert_eq!(page.source(), Some("'''Earth''' is"));
        assert!(page.html().is_none());
    }

    #[test]
    fn artifact_null_size_is_absent_not_zero() {
        let artifact: FileArtifact = serde_json::from_str(
            r#"{"mediatype":"BITMAP","size":null,"width":1280,"height":1280,"duration":null,"url":"//upload.wikimedia.org/a.jpg"}"#,
        )
        .unwrap();
        assert_eq!(artifact.size, None);
        assert_eq!(artifact.duration, None);
        assert_eq!(artifact.width, Some(1280));
        assert_eq!(artifact.mediatype, MediaType::Bitmap);
    }

    #[test]
    fn artifact_zero_size_is_distinct_from_absent() {
        let artifact: FileArtifact =
            serde_json::from_str(r#"{"mediatype":"AUDIO","size":0,"duration":12.5,"url":"u"}"#).unwrap();
        assert_eq!(artifact.size, Some(0));
        assert_eq!(artifact.duration, Some(12.5));
        assert_eq!(artifact.width, None);
    }

    #[test]
    fn media_type_variants() {
        let parse = |s: &str| serde_json::from_str::<MediaType>(&format!("\"{s}\"")).unwrap();
        assert_eq!(parse("3D"), MediaType::ThreeD);
        assert_eq!(parse("DRAWING"), MediaType::Drawing);
        assert_eq!(parse("UNKNOWN"), MediaType::Unknown);
        assert_eq!(parse("HOLOGRAM"), MediaType::Unknown);
    }

    #[test]
    fn revision_with_anonymous_user_and_unknown_delta() {
        let revision: PageRevision = serde_json::from_str(
            r#"{"id":42,"size":100,"minor":false,"timestamp":"2020-01-01T00:00:00Z",
                "user":{"id":null,"name":null},"comment":null,"delta":null}"#,
        )
        .unwrap();
        assert!(revision.is_anonymous());
        assert!(revision.page.is_none());
        assert!(revision.comment.is_none());
        assert!(revision.delta.is_none());
    }

    #[test]
    fn revision_fetched_by_id_has_page() {
        let revision: PageRevision = serde_json::from_str(
            r#"{"id":764138197,"page":{"id":9228,"title":"Earth"},"size":231,"minor":true,
                "timestamp":"2017-02-27T21:50:52Z","user":{"id":1,"name":"Example"},
                "comment":"typo","delta":-20}"#,
        )
        .unwrap();
        assert_eq!(revision.page.unwrap().title, "Earth");
        assert_eq!(revision.delta, Some(-20));
        assert_eq!(revision.user.name.as_deref(), Some("Example"));
    }

    #[test]
    fn search_result_keeps_polymorphic_fields() {
        let result: SearchResult = serde_json::from_str(
            r#"{"id":1,"key":"Earth","title":"Earth","excerpt":"<span>Earth</span>",
                "matched_title":null,"description":"planet",
                "thumbnail":{"mimetype":"image/jpeg","size":null,"width":200,"height":200,
                             "duration":null,"url":"//upload.wikimedia.org/t.jpg"}}"#,
        )
        .unwrap();
        assert!(result.matched_title.is_null());
        let thumb = result.thumbnail.unwrap();
        assert!(thumb.size.is_null());

        let result: SearchResult = serde_json::from_str(
            r#"{"id":2,"key":"Terra","title":"Terra","excerpt":"","matched_title":"Terra (planet)",
                "description":null,"thumbnail":{"mimetype":"video/webm","size":"large","duration":3.5,"url":"u"}}"#,
        )
        .unwrap();
        assert_eq!(result.matched_title, serde_json::json!("Terra (planet)"));
        let thumb = result.thumbnail.unwrap();
        assert_eq!(thumb.size, serde_json::json!("large"));
        assert_eq!(thumb.duration, serde_json::json!(3.5));
    }

    #[test]
    fn revision_filter_from_name() {
        assert_eq!(RevisionFilter::from_name("bot"), RevisionFilter::Bot);
        assert_eq!(RevisionFilter::from_name("reverted").as_param(), Some("reverted"));
        assert_eq!(RevisionFilter::from_name("vandalism"), RevisionFilter::None);
        assert_eq!(RevisionFilter::None.as_param(), None);
    }

    #[test]
    fn history_query_builders() {
        let q = HistoryQuery::older_than(100).filter(RevisionFilter::Minor);
        assert_eq!(q.older_than, Some(100));
        assert_eq!(q.newer_than, None);
        assert_eq!(q.filter, RevisionFilter::Minor);
        assert_eq!(HistoryQuery::latest(), HistoryQuery::default());
    }
}

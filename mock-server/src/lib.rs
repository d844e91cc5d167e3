//! A small stand-in for the Wikimedia Core REST API.
//!
//! Serves fixed fixtures for a handful of pages, revisions and files under
//! `/core/v1/<project>[/<language>]/...`, with the same response envelopes
//! and status codes as the real service. Used by the client's end-to-end
//! tests; `main.rs` runs it standalone.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Projects served without a language segment.
const LANGUAGE_FREE: [&str; 2] = ["commons", "wikispecies"];

const HISTORY_PAGE_SIZE: usize = 20;
const SEARCH_DEFAULT_LIMIT: usize = 50;
const SEARCH_MAX_LIMIT: usize = 100;

/// Error envelope used by the REST API.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "httpCode")]
    pub http_code: u16,
    #[serde(rename = "httpReason")]
    pub http_reason: String,
    #[serde(rename = "messageTranslations", skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

fn error(status: StatusCode, message: &str) -> Response {
    let body = ApiErrorBody {
        http_code: status.as_u16(),
        http_reason: status.canonical_reason().unwrap_or_default().to_string(),
        message: Some(json!({ "en": message })),
    };
    (status, Json(body)).into_response()
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "The specified resource could not be found")
}

/// A page of one wiki.
#[derive(Debug, Clone)]
pub struct PageFixture {
    pub id: u64,
    pub key: String,
    pub title: String,
    pub latest: Value,
    pub html: String,
    pub source: String,
    pub description: Option<String>,
    pub languages: Vec<Value>,
    /// `None` makes `/links/media` answer with an object lacking `files`.
    pub files: Option<Vec<Value>>,
    pub revisions: Vec<RevisionFixture>,
}

#[derive(Debug, Clone)]
pub struct RevisionFixture {
    pub revision: Value,
    pub reverted: bool,
    pub bot: bool,
}

impl RevisionFixture {
    fn id(&self) -> u64 {
        self.revision["id"].as_u64().unwrap_or_default()
    }
}

impl PageFixture {
    fn metadata(&self) -> serde_json::Map<String, Value> {
        let mut map = serde_json::Map::new();
        map.insert("id".into(), json!(self.id));
        map.insert("key".into(), json!(self.key));
        map.insert("title".into(), json!(self.title));
        map.insert("latest".into(), self.latest.clone());
        map.insert("content_model".into(), json!("wikitext"));
        map.insert(
            "license".into(),
            json!({
                "url": "https://creativecommons.org/licenses/by-sa/4.0/",
                "title": "Creative Commons Attribution-Share Alike 4.0"
            }),
        );
        map
    }
}

/// A wiki: one project in one language (or none).
#[derive(Debug, Clone, Default)]
pub struct WikiFixture {
    pub pages: Vec<PageFixture>,
    pub files: Vec<Value>,
}

impl WikiFixture {
    fn page(&self, title: &str) -> Option<&PageFixture> {
        let key = title.replace(' ', "_");
        self.pages.iter().find(|p| p.key == key)
    }

    fn revision(&self, id: u64) -> Option<(&PageFixture, &RevisionFixture)> {
        self.pages
            .iter()
            .find_map(|p| p.revisions.iter().find(|r| r.id() == id).map(|r| (p, r)))
    }

    fn file(&self, title: &str) -> Option<&Value> {
        let title = title.replace('_', " ");
        self.files
            .iter()
            .find(|f| f["title"].as_str().map(|t| t.replace('_', " ")) == Some(title.clone()))
    }
}

/// All wikis served, keyed by `project` or `project/language`.
pub type Db = Arc<HashMap<String, WikiFixture>>;

pub fn app() -> Router {
    app_with(fixtures())
}

pub fn app_with(wikis: HashMap<String, WikiFixture>) -> Router {
    let db: Db = Arc::new(wikis);
    Router::new()
        .route("/core/v1/{*rest}", get(dispatch))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn dispatch(
    State(db): State<Db>,
    Path(rest): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    tracing::debug!(path = %rest, ?params, "request");
    let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    let Some((&project, rest)) = segments.split_first() else {
        return not_found();
    };
    let (wiki_key, endpoint) = if LANGUAGE_FREE.contains(&project) {
        (project.to_string(), rest)
    } else {
        match rest.split_first() {
            Some((language, endpoint)) => (format!("{project}/{language}"), endpoint),
            None => return not_found(),
        }
    };
    let Some(wiki) = db.get(&wiki_key) else {
        return not_found();
    };

    match endpoint {
        ["page", title] => page(wiki, title, Some("source")),
        ["page", title, "bare"] => page(wiki, title, None),
        ["page", title, "with_html"] => page(wiki, title, Some("html")),
        ["page", title, "links", "language"] => languages(wiki, title),
        ["page", title, "links", "media"] => media(wiki, title),
        ["page", title, "history"] => history(wiki, title, &params),
        ["revision", id, "bare"] => revision(wiki, id),
        ["search", "page"] => search(wiki, &params, false),
        ["search", "title"] => search(wiki, &params, true),
        ["file", title] => file(wiki, title),
        _ => not_found(),
    }
}

fn page(wiki: &WikiFixture, title: &str, body: Option<&str>) -> Response {
    let Some(page) = wiki.page(title) else {
        return not_found();
    };
    let mut map = page.metadata();
    match body {
        Some("html") => {
            map.insert("html".into(), json!(page.html));
        }
        Some(_) => {
            map.insert("source".into(), json!(page.source));
        }
        None => {
            map.insert(
                "html_url".into(),
                json!(format!("/page/{}/html", page.key)),
            );
        }
    }
    Json(Value::Object(map)).into_response()
}

fn languages(wiki: &WikiFixture, title: &str) -> Response {
    match wiki.page(title) {
        Some(page) => Json(page.languages.clone()).into_response(),
        None => not_found(),
    }
}

fn media(wiki: &WikiFixture, title: &str) -> Response {
    let Some(page) = wiki.page(title) else {
        return not_found();
    };
    match &page.files {
        Some(files) => Json(json!({ "files": files })).into_response(),
        None => Json(json!({})).into_response(),
    }
}

fn history(wiki: &WikiFixture, title: &str, params: &HashMap<String, String>) -> Response {
    let Some(page) = wiki.page(title) else {
        return not_found();
    };
    let bound = |name: &str| params.get(name).map(|v| v.parse::<u64>());
    let older = bound("older_than");
    let newer = bound("newer_than");
    let (older, newer) = match (older, newer) {
        (Some(_), Some(_)) => {
            return error(
                StatusCode::BAD_REQUEST,
                "Parameters older_than and newer_than cannot both be specified",
            )
        }
        (Some(Err(_)), _) | (_, Some(Err(_))) => {
            return error(StatusCode::BAD_REQUEST, "Invalid revision id")
        }
        (older, newer) => (older.and_then(Result::ok), newer.and_then(Result::ok)),
    };

    let filter = params.get("filter").map(String::as_str);
    let matches_filter = |r: &RevisionFixture| match filter {
        None => true,
        Some("reverted") => r.reverted,
        Some("anonymous") => r.revision["user"]["name"].is_null(),
        Some("bot") => r.bot,
        Some("minor") => r.revision["minor"].as_bool().unwrap_or(false),
        Some(_) => false,
    };
    if let Some(f) = filter {
        if !["reverted", "anonymous", "bot", "minor"].contains(&f) {
            return error(StatusCode::BAD_REQUEST, "Invalid filter");
        }
    }

    let mut revisions: Vec<&RevisionFixture> = page
        .revisions
        .iter()
        .filter(|r| older.map_or(true, |id| r.id() < id))
        .filter(|r| newer.map_or(true, |id| r.id() > id))
        .filter(|r| matches_filter(*r))
        .collect();
    revisions.sort_by_key(|r| std::cmp::Reverse(r.id()));
    revisions.truncate(HISTORY_PAGE_SIZE);

    let revisions: Vec<Value> = revisions.into_iter().map(|r| r.revision.clone()).collect();
    Json(json!({
        "revisions": revisions,
        "latest": format!("/page/{}/history", page.key),
    }))
    .into_response()
}

fn revision(wiki: &WikiFixture, id: &str) -> Response {
    let Ok(id) = id.parse::<u64>() else {
        return error(StatusCode::BAD_REQUEST, "Invalid revision id");
    };
    let Some((page, revision)) = wiki.revision(id) else {
        return not_found();
    };
    let mut body = revision.revision.clone();
    body["page"] = json!({ "id": page.id, "title": page.title });
    Json(body).into_response()
}

fn search(wiki: &WikiFixture, params: &HashMap<String, String>, titles_only: bool) -> Response {
    let Some(query) = params.get("q") else {
        return error(StatusCode::BAD_REQUEST, "Parameter q is required");
    };
    let limit = match params.get("limit").map(|l| l.parse::<usize>()) {
        None => SEARCH_DEFAULT_LIMIT,
        Some(Ok(limit)) if (1..=SEARCH_MAX_LIMIT).contains(&limit) => limit,
        Some(_) => return error(StatusCode::BAD_REQUEST, "Invalid limit"),
    };

    let needle = query.to_lowercase();
    let pages: Vec<Value> = wiki
        .pages
        .iter()
        .filter(|p| {
            let title = p.title.to_lowercase();
            if titles_only {
                title.starts_with(&needle)
            } else {
                title.contains(&needle) || p.source.to_lowercase().contains(&needle)
            }
        })
        .take(limit)
        .map(|p| {
            let excerpt = if titles_only {
                Value::Null
            } else {
                json!(format!("<span class=\"searchmatch\">{}</span>", p.title))
            };
            json!({
                "id": p.id,
                "key": p.key,
                "title": p.title,
                "excerpt": excerpt,
                "matched_title": null,
                "description": p.description,
                "thumbnail": {
                    "mimetype": "image/jpeg",
                    "size": null,
                    "width": 200,
                    "height": 200,
                    "duration": null,
                    "url": format!("//upload.wikimedia.org/thumb/{}.jpg", p.key),
                },
            })
        })
        .collect();
    Json(json!({ "pages": pages })).into_response()
}

fn file(wiki: &WikiFixture, title: &str) -> Response {
    match wiki.file(title) {
        Some(file) => Json(file.clone()).into_response(),
        None => not_found(),
    }
}

fn artifact(mediatype: &str, size: Option<u64>, width: u32, height: u32, url: &str) -> Value {
    json!({
        "mediatype": mediatype,
        "size": size,
        "width": width,
        "height": height,
        "duration": null,
        "url": url,
    })
}

fn blue_marble(with_thumbnail: bool) -> Value {
    let mut file = json!({
        "title": "The Blue Marble.jpg",
        "file_description_url": "//commons.wikimedia.org/wiki/File:The_Blue_Marble.jpg",
        "latest": {
            "timestamp": "2019-06-10T09:14:27Z",
            "user": { "id": 14957, "name": "Example Uploader" }
        },
        "preferred": artifact("BITMAP", None, 599, 600, "//upload.wikimedia.org/599px-The_Blue_Marble.jpg"),
        "original": artifact("BITMAP", Some(6849024), 3000, 3002, "//upload.wikimedia.org/The_Blue_Marble.jpg"),
    });
    if with_thumbnail {
        file["thumbnail"] = artifact("BITMAP", None, 1023, 1024, "//upload.wikimedia.org/1023px-The_Blue_Marble.jpg");
    }
    file
}

fn earth_revisions() -> Vec<RevisionFixture> {
    let rev = |id: u64, size: u64, minor: bool, ts: &str, user: Value, comment: Value, delta: Value| {
        json!({
            "id": id,
            "size": size,
            "minor": minor,
            "timestamp": ts,
            "user": user,
            "comment": comment,
            "delta": delta,
        })
    };
    vec![
        RevisionFixture {
            revision: rev(1185522940, 254_921, false, "2023-11-16T08:13:25Z",
                json!({"id": 4123, "name": "Astro"}), json!("Update orbital data"), json!(112)),
            reverted: false,
            bot: false,
        },
        RevisionFixture {
            revision: rev(1185400000, 254_809, false, "2023-11-15T20:01:00Z",
                json!({"id": null, "name": null}), json!(""), json!(-48)),
            reverted: true,
            bot: false,
        },
        RevisionFixture {
            revision: rev(1185300000, 254_857, true, "2023-11-15T10:30:11Z",
                json!({"id": 77, "name": "CitationBot"}), json!("Add: doi"), json!(20)),
            reverted: false,
            bot: true,
        },
        RevisionFixture {
            revision: rev(1185000000, 254_837, true, "2023-11-13T17:45:02Z",
                json!({"id": 901, "name": "Geologist"}), Value::Null, Value::Null),
            reverted: false,
            bot: false,
        },
    ]
}

/// The fixtures served by `app()`.
pub fn fixtures() -> HashMap<String, WikiFixture> {
    let earth = PageFixture {
        id: 9228,
        key: "Earth".into(),
        title: "Earth".into(),
        latest: json!({ "id": 1185522940, "timestamp": "2023-11-16T08:13:25Z" }),
        html: "<p><b>Earth</b> is the third planet from the Sun.</p>".into(),
        source: "'''Earth''' is the third planet from the [[Sun]].".into(),
        description: Some("Third planet from the Sun".into()),
        languages: vec![
            json!({ "code": "de", "name": "Deutsch", "key": "Erde", "title": "Erde" }),
            json!({ "code": "fr", "name": "français", "key": "Terre", "title": "Terre" }),
        ],
        files: Some(vec![blue_marble(false)]),
        revisions: earth_revisions(),
    };
    let moon = PageFixture {
        id: 19331,
        key: "Moon".into(),
        title: "Moon".into(),
        latest: json!({ "id": 1180000001, "timestamp": "2023-10-20T12:00:00Z" }),
        html: "<p>The <b>Moon</b> is Earth's only natural satellite.</p>".into(),
        source: "The '''Moon''' is [[Earth]]'s only natural satellite.".into(),
        description: None,
        languages: Vec::new(),
        files: Some(Vec::new()),
        revisions: Vec::new(),
    };
    let nowhere = PageFixture {
        id: 1,
        key: "Nowhere".into(),
        title: "Nowhere".into(),
        latest: json!({ "id": 10, "timestamp": "2001-01-15T00:00:00Z" }),
        html: String::new(),
        source: String::new(),
        description: None,
        languages: Vec::new(),
        files: None,
        revisions: Vec::new(),
    };
    let erde = PageFixture {
        id: 1185,
        key: "Erde".into(),
        title: "Erde".into(),
        latest: json!({ "id": 238000000, "timestamp": "2023-11-01T09:00:00Z" }),
        html: "<p>Die <b>Erde</b> ist der dritte Planet.</p>".into(),
        source: "Die '''Erde''' ist der dritte Planet.".into(),
        description: Some("dritter Planet".into()),
        languages: vec![json!({ "code": "en", "name": "English", "key": "Earth", "title": "Earth" })],
        files: Some(Vec::new()),
        revisions: Vec::new(),
    };

    HashMap::from([
        (
            "wikipedia/en".to_string(),
            WikiFixture {
                pages: vec![earth, moon, nowhere],
                files: Vec::new(),
            },
        ),
        (
            "wikipedia/de".to_string(),
            WikiFixture {
                pages: vec![erde],
                files: Vec::new(),
            },
        ),
        (
            "commons".to_string(),
            WikiFixture {
                pages: Vec::new(),
                files: vec![blue_marble(true)],
            },
        ),
    ])
}

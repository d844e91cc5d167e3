use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn get(uri: &str) -> axum::response::Response {
    app()
        .oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
        .await
        .unwrap()
}

// --- pages ---

#[tokio::test]
async fn bare_page_has_metadata_only() {
    let resp = get("/core/v1/wikipedia/en/page/Earth/bare").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_json(resp).await;
    assert_eq!(page["id"], 9228);
    assert_eq!(page["title"], "Earth");
    assert_eq!(page["latest"]["id"], 1185522940);
    assert!(page.get("html").is_none());
    assert!(page.get("source").is_none());
}

#[tokio::test]
async fn with_html_and_source_modes() {
    let page = body_json(get("/core/v1/wikipedia/en/page/Earth/with_html").await).await;
    assert!(page["html"].as_str().unwrap().contains("<b>Earth</b>"));
    assert!(page.get("source").is_none());

    let page = body_json(get("/core/v1/wikipedia/en/page/Earth").await).await;
    assert!(page["source"].as_str().unwrap().starts_with("'''Earth'''"));
    assert!(page.get("html").is_none());
}

#[tokio::test]
async fn language_segment_selects_wiki() {
    let resp = get("/core/v1/wikipedia/de/page/Erde/bare").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["title"], "Erde");

    let resp = get("/core/v1/wikipedia/de/page/Earth/bare").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_language_segment_is_not_found() {
    let resp = get("/core/v1/wikipedia/page/Earth/bare").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_page_uses_error_envelope() {
    let resp = get("/core/v1/wikipedia/en/page/Atlantis/bare").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["httpCode"], 404);
    assert_eq!(body["httpReason"], "Not Found");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let resp = get("/core/v1/wikipedia/en/transform/wikitext/to/html").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = get("/v2/anything").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

// --- links ---

#[tokio::test]
async fn page_languages() {
    let langs = body_json(get("/core/v1/wikipedia/en/page/Earth/links/language").await).await;
    let langs = langs.as_array().unwrap();
    assert_eq!(langs.len(), 2);
    assert_eq!(langs[0]["code"], "de");
}

#[tokio::test]
async fn page_media_is_wrapped() {
    let body = body_json(get("/core/v1/wikipedia/en/page/Earth/links/media").await).await;
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0]["preferred"]["size"].is_null());
}

#[tokio::test]
async fn malformed_media_fixture_lacks_files_key() {
    let resp = get("/core/v1/wikipedia/en/page/Nowhere/links/media").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, serde_json::json!({}));
}

// --- history ---

#[tokio::test]
async fn history_latest_first() {
    let body = body_json(get("/core/v1/wikipedia/en/page/Earth/history").await).await;
    let revisions = body["revisions"].as_array().unwrap();
    assert_eq!(revisions.len(), 4);
    assert_eq!(revisions[0]["id"], 1185522940);
    assert!(revisions[0].get("page").is_none());
}

#[tokio::test]
async fn history_bounds_and_filters() {
    let body = body_json(get("/core/v1/wikipedia/en/page/Earth/history?older_than=1185400000").await).await;
    let ids: Vec<u64> = body["revisions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1185300000, 1185000000]);

    let body = body_json(get("/core/v1/wikipedia/en/page/Earth/history?filter=anonymous").await).await;
    let revisions = body["revisions"].as_array().unwrap();
    assert_eq!(revisions.len(), 1);
    assert!(revisions[0]["user"]["name"].is_null());

    let body = body_json(get("/core/v1/wikipedia/en/page/Earth/history?filter=minor&newer_than=1185000000").await).await;
    let revisions = body["revisions"].as_array().unwrap();
    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0]["id"], 1185300000);
}

#[tokio::test]
async fn history_rejects_both_bounds() {
    let resp = get("/core/v1/wikipedia/en/page/Earth/history?older_than=100&newer_than=50").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn history_rejects_unknown_filter() {
    let resp = get("/core/v1/wikipedia/en/page/Earth/history?filter=vandalism").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- revisions ---

#[tokio::test]
async fn revision_includes_page() {
    let resp = get("/core/v1/wikipedia/en/revision/1185000000/bare").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let revision = body_json(resp).await;
    assert_eq!(revision["page"]["title"], "Earth");
    assert!(revision["delta"].is_null());
}

#[tokio::test]
async fn revision_not_found() {
    let resp = get("/core/v1/wikipedia/en/revision/1/bare").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn revision_bad_id_returns_400() {
    let resp = get("/core/v1/wikipedia/en/revision/latest/bare").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- search ---

#[tokio::test]
async fn content_search_matches_source() {
    let body = body_json(get("/core/v1/wikipedia/en/search/page?q=earth").await).await;
    let titles: Vec<&str> = body["pages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Earth", "Moon"]);
}

#[tokio::test]
async fn title_search_is_prefix_and_limited() {
    let body = body_json(get("/core/v1/wikipedia/en/search/title?q=mo&limit=1").await).await;
    let pages = body["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0]["key"], "Moon");
    assert!(pages[0]["excerpt"].is_null());
}

#[tokio::test]
async fn search_requires_query() {
    let resp = get("/core/v1/wikipedia/en/search/page").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- files ---

#[tokio::test]
async fn commons_file_has_thumbnail() {
    let resp = get("/core/v1/commons/file/The_Blue_Marble.jpg").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let file = body_json(resp).await;
    assert_eq!(file["title"], "The Blue Marble.jpg");
    assert_eq!(file["original"]["size"], 6849024);
    assert!(file["thumbnail"].is_object());
}

#[tokio::test]
async fn commons_has_no_language_segment() {
    let resp = get("/core/v1/commons/en/file/The_Blue_Marble.jpg").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

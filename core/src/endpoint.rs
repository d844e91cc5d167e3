//! URL construction for the Core REST API.
//!
//! # Design
//! Endpoint operations describe their target as a relative path string,
//! optionally carrying an already-encoded query (`/search/page?q=earth`).
//! `resolve` joins it onto the base URL as
//! `<base>/core/v1/<project>[/<language>]/<path>[?<query>]`.
//!
//! The path and query are split at the first `?` before joining. The path
//! goes through `Url::set_path`, which escapes what a path cannot contain but
//! leaves existing `%XX` escapes and `/` separators alone; the query goes
//! through `Url::set_query`. The query separator therefore stays a literal
//! `?` instead of being escaped into the path as `%3F`.

use url::Url;

use crate::project::Project;

/// The API family segment.
pub const API_FAMILY: &str = "core";

/// The API version segment.
pub const API_VERSION: &str = "v1";

/// Resolve `endpoint` for `project` against `base`.
pub fn resolve(base: &Url, project: &Project, endpoint: &str) -> Url {
    let (path, query) = match endpoint.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (endpoint, None),
    };

    let mut full = base.path().trim_end_matches('/').to_string();
    for segment in [API_FAMILY, API_VERSION, project.name()] {
        full.push('/');
        full.push_str(segment);
    }
    if let Some(language) = project.language() {
        full.push('/');
        full.push_str(language.as_str());
    }
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        full.push('/');
        full.push_str(segment);
    }

    let mut url = base.clone();
    url.set_path(&full);
    url.set_query(query.filter(|q| !q.is_empty()));
    url.set_fragment(None);
    url
}

/// Encode `pairs` as an `application/x-www-form-urlencoded` query and append
/// it to `path`. An empty pair list leaves `path` unchanged.
pub fn with_query<'a>(path: &str, pairs: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in pairs {
        serializer.append_pair(key, &value);
        any = true;
    }
    if any {
        format!("{path}?{}", serializer.finish())
    } else {
        path.to_string()
    }
}

//! HTTP request handlers.

pub(crate) mod repairs;
pub(crate) mod steps;

use std::time::SystemTime;

use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::Deserialize;

/// Handle GET /.
#[allow(clippy::unused_async)]
pub(crate) async fn redirect_root() -> Redirect {
    Redirect::to("/repairs")
}

/// Raw query pairs. A repeated key keeps its last value.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub(crate) struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Last value given for `key`.
    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Build a cacheable HTML response, or 304 if the client copy is current.
pub(crate) fn cached_html(
    version: &str,
    headers: &HeaderMap,
    html: String,
    modified: Option<SystemTime>,
) -> Response {
    let etag = compute_etag(version, &html);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && etag_matches(if_none_match, &etag)
    {
        return StatusCode::NOT_MODIFIED.into_response();
    }

    let mut response = (
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        Html(html),
    )
        .into_response();

    if let Some(modified) = modified
        && let Ok(value) = HeaderValue::from_str(&http_date(modified.into()))
    {
        response.headers_mut().insert(header::LAST_MODIFIED, value);
    }

    response
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars) - sufficient for
/// cache invalidation with negligible collision probability.
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

/// Weak comparison of an `If-None-Match` list against `etag`.
fn etag_matches(if_none_match: &HeaderValue, etag: &str) -> bool {
    let Ok(value) = if_none_match.to_str() else {
        return false;
    };
    value
        .split(',')
        .map(str::trim)
        .any(|tag| tag == "*" || tag.strip_prefix("W/").unwrap_or(tag) == etag)
}

/// Format a timestamp as an HTTP date.
fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

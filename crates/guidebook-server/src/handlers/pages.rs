//! Page routes.
//!
//! Every path not claimed by the API or `/public` is dispatched here:
//! classified against the content tree, rendered in its shell, and
//! returned as HTML. Each response counts as a completed navigation for
//! analytics.
//!
//! Only `GET` and `HEAD` are served. A trailing slash redirects to the
//! slash-less path, the form every page link uses.

use std::borrow::Cow;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Redirect, Response};
use md5::{Digest, Md5};
use percent_encoding::percent_decode_str;

use crate::shell::{render_not_found, render_route};
use crate::state::AppState;

/// Handle any page path.
pub(crate) async fn serve_route(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD")],
        )
            .into_response();
    }

    let raw = uri.path();
    if raw.len() > 1 && raw.ends_with('/') {
        // Leading slashes collapse so the target stays on this host
        let trimmed = format!("/{}", raw.trim_matches('/'));
        let target = match uri.query() {
            Some(query) => format!("{trimmed}?{query}"),
            None => trimmed,
        };
        return Redirect::permanent(&target).into_response();
    }

    // Slugs are matched decoded; undecodable paths can't name a page
    let (decoded, route) = match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => {
            let route = render_route(&state.site, &state.chrome, &decoded);
            (decoded, route)
        }
        Err(_) => (Cow::Borrowed(raw), render_not_found(&state.chrome)),
    };
    let path: &str = &decoded;

    // Log warnings in verbose mode
    if state.verbose {
        for warning in &route.warnings {
            tracing::warn!(path = %path, warning = %warning, "Page render warning");
        }
    }
    tracing::debug!(path = %path, mode = %route.kind, status = route.status.as_u16(), "Route dispatched");

    state.analytics.route_change_complete(path);

    let etag = compute_etag(&state.version, &route.html);

    // Check If-None-Match header for conditional request
    if route.status == StatusCode::OK
        && let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
    }

    (
        route.status,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_owned()),
            (header::ETAG, etag),
            (
                header::LAST_MODIFIED,
                state
                    .loaded_at
                    .format("%a, %d %b %Y %H:%M:%S GMT")
                    .to_string(),
            ),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        route.html,
    )
        .into_response()
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

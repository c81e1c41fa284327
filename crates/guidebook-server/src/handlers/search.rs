//! Search API endpoints.
//!
//! - `GET /api/search?q=` searches page titles and text
//! - `GET /api/search/{slug}?q=` finds text matches inside one page

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use guidebook_site::{SearchHit, TextMatch};
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::state::AppState;

/// Query string for both search endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Response for GET /api/search.
#[derive(Serialize)]
pub(crate) struct SearchResponse {
    query: String,
    results: Vec<SearchHit>,
}

/// Response for GET /api/search/{slug}.
#[derive(Serialize)]
pub(crate) struct TextMatchResponse {
    slug: String,
    query: String,
    matches: Vec<TextMatch>,
}

/// Handle GET /api/search.
pub(crate) async fn search_pages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let results = state.site.search().search_pages(&query.q);
    tracing::debug!(query = %query.q, hits = results.len(), "Page search");
    Json(SearchResponse {
        query: query.q,
        results,
    })
}

/// Handle GET /api/search/ (root page).
pub(crate) async fn search_root_text_match(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<TextMatchResponse>, ServerError> {
    text_match_impl(String::new(), &state, query)
}

/// Handle GET /api/search/{slug}.
pub(crate) async fn search_text_match(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<TextMatchResponse>, ServerError> {
    text_match_impl(slug, &state, query)
}

fn text_match_impl(
    slug: String,
    state: &AppState,
    query: SearchQuery,
) -> Result<Json<TextMatchResponse>, ServerError> {
    if state.site.source(&slug).is_none() {
        return Err(ServerError::PageNotFound(slug));
    }
    let matches = state.site.search().search_text_match(&slug, &query.q);
    Ok(Json(TextMatchResponse {
        slug,
        query: query.q,
        matches,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_serialization() {
        let response = SearchResponse {
            query: "hooks".to_owned(),
            results: vec![SearchHit {
                slug: "hooks".to_owned(),
                title: "Hooks".to_owned(),
                path: "/hooks".to_owned(),
                score: 11,
            }],
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["query"], "hooks");
        assert_eq!(json["results"][0]["path"], "/hooks");
        assert_eq!(json["results"][0]["score"], 11);
    }

    #[test]
    fn test_missing_query_defaults_to_empty() {
        let query: SearchQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.q, "");
    }
}

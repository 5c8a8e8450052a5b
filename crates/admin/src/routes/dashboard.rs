//! Dashboard route handler.

use aigenthix_core::BlogListItem;
use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::middleware::RequireToken;
use crate::panel::{BlogFilter, BlogListState, DashboardStats};
use crate::state::AppState;

/// Dashboard query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub filter: BlogFilter,
    #[serde(default)]
    pub q: String,
}

/// Dashboard view.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub filter: BlogFilter,
    pub q: String,
    pub blogs: Vec<BlogListItem>,
    pub loading: bool,
    pub error: Option<String>,
    /// Text for an empty table.
    pub empty_message: Option<&'static str>,
}

impl DashboardView {
    #[must_use]
    pub fn build(state: &BlogListState, query: DashboardQuery) -> Self {
        let blogs: Vec<BlogListItem> = state
            .filtered(query.filter, &query.q)
            .into_iter()
            .cloned()
            .collect();
        let narrowed = !query.q.trim().is_empty() || query.filter != BlogFilter::All;
        let empty_message = blogs.is_empty().then_some(if narrowed {
            "No blogs match your filter"
        } else {
            "No blogs yet"
        });
        Self {
            stats: state.stats(),
            filter: query.filter,
            q: query.q,
            blogs,
            loading: state.loading,
            error: state.error.clone(),
            empty_message,
        }
    }
}

/// GET /dashboard
#[instrument(skip(state, token))]
pub async fn index(
    RequireToken(token): RequireToken,
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Json<DashboardView> {
    let list = BlogListState::load(&state.blogs(&token)).await;
    Json(DashboardView::build(&list, query))
}

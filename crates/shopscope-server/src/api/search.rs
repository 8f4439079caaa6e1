use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use shopscope_core::ProductSummary;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResponse {
    products: Vec<ProductSummary>,
}

/// Keyword search, `GET /api/products?query=<term>`.
///
/// An empty or missing query is rejected before any upstream call. Upstream
/// results are normalized into summaries, preserving upstream order.
pub(super) async fn search_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    if params.query.is_empty() {
        return Err(ApiError::QueryRequired);
    }
    let upstream = state.upstream.as_ref().ok_or(ApiError::MissingApiKey)?;

    let body = upstream.search(&params.query).await?;
    let products = shopscope_zenserp::summaries_from_search(&body);
    tracing::debug!(
        request_id = %req_id.0,
        query = %params.query,
        count = products.len(),
        "search results normalized"
    );

    Ok(Json(SearchResponse { products }))
}

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use shopscope_core::ProductDetail;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct DetailResponse {
    product: ProductDetail,
}

/// Single product lookup, `GET /api/products/{product_id}`.
///
/// The requested identifier doubles as the fallback id when the upstream
/// payload omits its own.
pub(super) async fn product_detail(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<String>,
) -> Result<Json<DetailResponse>, ApiError> {
    if product_id.is_empty() {
        return Err(ApiError::ProductIdRequired);
    }
    let upstream = state.upstream.as_ref().ok_or(ApiError::MissingApiKey)?;

    let body = upstream.fetch_product(&product_id).await?;
    let product = shopscope_zenserp::to_detail(&body, &product_id);
    tracing::debug!(
        request_id = %req_id.0,
        product_id = %product_id,
        "product detail normalized"
    );

    Ok(Json(DetailResponse { product }))
}

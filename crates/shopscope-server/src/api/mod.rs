mod detail;
mod search;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use shopscope_zenserp::{ZenserpClient, ZenserpError};
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::request_id;

/// Shared handler state.
///
/// `upstream` is `None` when no API key is configured; product routes then
/// answer each request with the missing-key error instead of the process
/// refusing to start.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Option<Arc<ZenserpClient>>,
}

/// Errors surfaced by the HTTP API.
///
/// The `Display` string of each variant is the `error` field of the JSON
/// response body, so variant messages are part of the wire contract.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Query is required")]
    QueryRequired,

    #[error("Product ID is required")]
    ProductIdRequired,

    #[error("API key is missing")]
    MissingApiKey,

    /// Non-2xx from Zenserp: the status code is mirrored and the upstream
    /// body is relayed under `details`.
    #[error("Zenserp API error")]
    Upstream {
        status: u16,
        details: serde_json::Value,
    },

    /// Transport failure or an unparseable upstream body.
    #[error("Internal Server Error")]
    Internal { details: String },
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::QueryRequired | Self::ProductIdRequired => StatusCode::BAD_REQUEST,
            Self::MissingApiKey | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = match &self {
            Self::Upstream { details, .. } => {
                json!({ "error": self.to_string(), "details": details })
            }
            Self::Internal { details } => {
                json!({ "error": self.to_string(), "details": details })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ZenserpError> for ApiError {
    fn from(error: ZenserpError) -> Self {
        match error {
            ZenserpError::MissingApiKey => Self::MissingApiKey,
            ZenserpError::Status { status, body } => {
                tracing::warn!(status, "relaying upstream error status");
                Self::Upstream {
                    status,
                    details: body,
                }
            }
            other => {
                tracing::error!(error = %other, "upstream request failed");
                Self::Internal {
                    details: other.to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/products", get(search::search_products))
        .route("/api/products/{product_id}", get(detail::product_detail))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_app(upstream_uri: &str) -> Router {
        let client = ZenserpClient::with_base_url("test-key", 30, upstream_uri)
            .expect("client construction should not fail");
        build_app(AppState {
            upstream: Some(Arc::new(client)),
        })
    }

    fn keyless_app() -> Router {
        build_app(AppState { upstream: None })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    // -------------------------------------------------------------------------
    // ApiError unit tests
    // -------------------------------------------------------------------------

    #[test]
    fn api_error_query_required_maps_to_bad_request() {
        let response = ApiError::QueryRequired.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn api_error_product_id_required_body_is_exact() {
        let response = ApiError::ProductIdRequired.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json, json!({ "error": "Product ID is required" }));
    }

    #[test]
    fn api_error_upstream_status_is_mirrored() {
        let response = ApiError::Upstream {
            status: 503,
            details: json!({ "error": "quota exceeded" }),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn api_error_unrepresentable_upstream_status_becomes_internal() {
        let response = ApiError::Upstream {
            status: 99,
            details: json!(null),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // -------------------------------------------------------------------------
    // Route integration tests (wiremock upstream)
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn health_returns_ok() {
        let (status, body) = get_json(keyless_app(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn search_with_empty_query_is_bad_request() {
        let (status, body) = get_json(keyless_app(), "/api/products?query=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Query is required" }));
    }

    #[tokio::test]
    async fn search_with_missing_query_param_is_bad_request() {
        let (status, body) = get_json(keyless_app(), "/api/products").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Query is required" }));
    }

    #[tokio::test]
    async fn search_without_api_key_is_internal_error() {
        let (status, body) = get_json(keyless_app(), "/api/products?query=laptop").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "API key is missing" }));
    }

    #[tokio::test]
    async fn search_returns_normalized_products_in_order() {
        let server = MockServer::start().await;
        let upstream_body = json!({
            "shopping_results": [
                {
                    "position": 1,
                    "product_id": "4887",
                    "title": "Wireless Keyboard",
                    "price": "$49.99",
                    "source": "TechMart",
                    "thumbnail": "https://img.example.com/thumb.jpg"
                },
                {}
            ]
        });
        Mock::given(method("GET"))
            .and(path("/api/v2/search"))
            .and(query_param("q", "keyboard"))
            .and(query_param("tbm", "shop"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&upstream_body))
            .mount(&server)
            .await;

        let (status, body) = get_json(test_app(&server.uri()), "/api/products?query=keyboard").await;

        assert_eq!(status, StatusCode::OK);
        let products = body["products"].as_array().expect("products array");
        assert_eq!(products.len(), 2);

        assert_eq!(products[0]["id"], "4887");
        assert_eq!(products[0]["name"], "Wireless Keyboard");
        assert_eq!(products[0]["price"], 49.99);
        assert_eq!(products[0]["seller"], "TechMart");
        assert_eq!(products[0]["productId"], "4887");

        // The bare second item degrades to defaults, keyed by its index.
        assert_eq!(products[1]["id"], "1");
        assert_eq!(products[1]["name"], "");
        assert_eq!(products[1]["price"], 0.0);
        assert_eq!(products[1]["seller"], "Unknown");
        assert!(products[1].get("productId").is_none());
    }

    #[tokio::test]
    async fn search_mirrors_upstream_error_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/search"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(json!({ "error": "quota exceeded" })),
            )
            .mount(&server)
            .await;

        let (status, body) = get_json(test_app(&server.uri()), "/api/products?query=laptop").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Zenserp API error");
        assert_eq!(body["details"]["error"], "quota exceeded");
    }

    #[tokio::test]
    async fn search_with_malformed_upstream_body_is_internal_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("surprise, not json"))
            .mount(&server)
            .await;

        let (status, body) = get_json(test_app(&server.uri()), "/api/products?query=laptop").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn detail_returns_normalized_product() {
        let server = MockServer::start().await;
        let upstream_body = json!({
            "product_id": "4887",
            "title": "Wireless Keyboard",
            "image": "https://img.example.com/full.jpg",
            "description": "A keyboard without wires.",
            "sellers": [
                {
                    "merchant": "TechMart",
                    "item_price": { "value": 49.99 },
                    "shipping_price": { "value": 4.99 },
                    "total_price": { "value": 54.98 },
                    "details": "Free returns",
                    "url": "/shopping/product/4887?seller=techmart"
                }
            ]
        });
        Mock::given(method("GET"))
            .and(path("/api/v1/shopping"))
            .and(query_param("product_id", "4887"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&upstream_body))
            .mount(&server)
            .await;

        let (status, body) = get_json(test_app(&server.uri()), "/api/products/4887").await;

        assert_eq!(status, StatusCode::OK);
        let product = &body["product"];
        assert_eq!(product["id"], "4887");
        assert_eq!(product["name"], "Wireless Keyboard");
        assert_eq!(product["price"], 49.99);
        assert_eq!(product["seller"], "TechMart");
        assert_eq!(product["shipping"], 4.99);
        assert_eq!(product["totalPrice"], 54.98);
        assert_eq!(product["details"], "Free returns");
        assert_eq!(product["url"], "/shopping/product/4887?seller=techmart");
    }

    #[tokio::test]
    async fn detail_uses_requested_id_when_upstream_omits_one() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/shopping"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "title": "Mystery Item" })),
            )
            .mount(&server)
            .await;

        let (status, body) = get_json(test_app(&server.uri()), "/api/products/fallback-42").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["product"]["id"], "fallback-42");
        assert_eq!(body["product"]["name"], "Mystery Item");
    }

    #[tokio::test]
    async fn detail_mirrors_upstream_error_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/shopping"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(json!({ "error": "backend down" })),
            )
            .mount(&server)
            .await;

        let (status, body) = get_json(test_app(&server.uri()), "/api/products/4887").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Zenserp API error");
        assert_eq!(body["details"]["error"], "backend down");
    }

    #[tokio::test]
    async fn detail_without_api_key_is_internal_error() {
        let (status, body) = get_json(keyless_app(), "/api/products/4887").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "API key is missing" }));
    }

    // -------------------------------------------------------------------------
    // Request-id middleware
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn responses_carry_a_request_id_header() {
        let response = keyless_app()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        let header = response
            .headers()
            .get("x-request-id")
            .expect("x-request-id header present");
        assert!(!header.to_str().expect("header is ascii").is_empty());
    }

    #[tokio::test]
    async fn incoming_request_id_is_echoed_back() {
        let response = keyless_app()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("x-request-id", "fixed-id-123")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .expect("x-request-id header present"),
            "fixed-id-123"
        );
    }
}

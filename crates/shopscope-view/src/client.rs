//! HTTP client for the product-search API.
//!
//! Mirrors the response handling the results page needs: the status code is
//! never consulted, only the body shape. A body with an `error` field turns
//! into [`ViewError::Api`] with the upstream details flattened into the
//! message; a body with neither payload nor error, and any transport or
//! decode failure, turns into the generic [`ViewError::Fetch`].

use serde::Deserialize;
use serde_json::Value;
use shopscope_core::{ProductDetail, ProductSummary};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "shopscope/0.1 (product-search)";

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("invalid api base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The API answered with an error body. The message is already
    /// display-ready, details included.
    #[error("{0}")]
    Api(String),

    /// Transport failure, undecodable body, or a body that carried neither
    /// a payload nor an error.
    #[error("Failed to load products")]
    Fetch(String),
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    products: Option<Vec<ProductSummary>>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    #[serde(default)]
    product: Option<ProductDetail>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<Value>,
}

/// Client for the search and detail endpoints.
#[derive(Debug, Clone)]
pub struct ProductsClient {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl ProductsClient {
    /// Creates a client rooted at `base_url`, e.g. `http://localhost:3000`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`ViewError::Fetch`] if the underlying HTTP client cannot be
    /// built.
    pub fn new(base_url: &str) -> Result<Self, ViewError> {
        let base_url =
            reqwest::Url::parse(base_url).map_err(|error| ViewError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: error.to_string(),
            })?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| ViewError::Fetch(error.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Fetches the product summaries for `query` via `GET /api/products`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Api`] when the API answers with an error body,
    /// [`ViewError::Fetch`] on transport or decode failure.
    pub async fn search(&self, query: &str) -> Result<Vec<ProductSummary>, ViewError> {
        let mut url = self.search_url();
        url.query_pairs_mut().append_pair("query", query);

        let envelope: SearchEnvelope = self.get_json(url).await?;
        if let Some(error) = envelope.error {
            return Err(ViewError::Api(flatten_error(&error, envelope.details.as_ref())));
        }
        envelope.products.ok_or_else(|| {
            ViewError::Fetch("response body had neither products nor error".to_owned())
        })
    }

    /// Fetches the full detail for `product_id` via
    /// `GET /api/products/{product_id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Api`] when the API answers with an error body,
    /// [`ViewError::Fetch`] on transport or decode failure.
    pub async fn fetch_detail(&self, product_id: &str) -> Result<ProductDetail, ViewError> {
        let mut url = self.search_url();
        // push() percent-encodes the id, so slashes cannot break the path.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(product_id);
        }

        let envelope: DetailEnvelope = self.get_json(url).await?;
        if let Some(error) = envelope.error {
            return Err(ViewError::Api(flatten_error(&error, envelope.details.as_ref())));
        }
        envelope.product.ok_or_else(|| {
            ViewError::Fetch("response body had neither product nor error".to_owned())
        })
    }

    fn search_url(&self) -> reqwest::Url {
        let mut url = self.base_url.clone();
        url.set_path("/api/products");
        url
    }

    async fn get_json<T>(&self, url: reqwest::Url) -> Result<T, ViewError>
    where
        T: serde::de::DeserializeOwned,
    {
        // Error statuses still carry the envelope, so the status itself is
        // deliberately not checked here.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| ViewError::Fetch(error.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|error| ViewError::Fetch(error.to_string()))?;
        serde_json::from_str(&body).map_err(|error| ViewError::Fetch(error.to_string()))
    }
}

/// Builds the display message for an API error body: the `error` string,
/// plus `": "` and the JSON-serialized details when any were attached.
fn flatten_error(error: &str, details: Option<&Value>) -> String {
    match details {
        None | Some(Value::Null) => error.to_owned(),
        Some(details) => {
            let rendered =
                serde_json::to_string(details).unwrap_or_else(|_| details.to_string());
            format!("{error}: {rendered}")
        }
    }
}

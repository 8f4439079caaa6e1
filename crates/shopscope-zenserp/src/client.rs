//! HTTP client for the Zenserp shopping API.
//!
//! Wraps `reqwest` with Zenserp-specific error handling and API key
//! management. Endpoints return the raw JSON body; shaping those loosely
//! typed payloads into API types happens in [`crate::normalize`] so that a
//! malformed upstream field never turns into a request failure.

use std::time::Duration;

use reqwest::{Client, Url};
use shopscope_core::AppConfig;

use crate::error::ZenserpError;

const DEFAULT_BASE_URL: &str = "https://app.zenserp.com/";
const SEARCH_PATH: &str = "/api/v2/search";
const SHOPPING_PATH: &str = "/api/v1/shopping";

/// Fixed location pin for product detail lookups. Zenserp requires one and
/// seller offers vary by region, so every lookup uses the same pin to keep
/// results stable.
pub const SHOPPING_LOCATION: &str = "Manhattan,New York,United States";

/// Client for the Zenserp shopping API.
///
/// Manages the HTTP client, API key, and base URL. Use
/// [`ZenserpClient::from_config`] for production or
/// [`ZenserpClient::with_base_url`] to point at a mock server in tests.
pub struct ZenserpClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl ZenserpClient {
    /// Creates a client from application configuration, pointed at the
    /// production Zenserp API.
    ///
    /// # Errors
    ///
    /// Returns [`ZenserpError::MissingApiKey`] if no API key is configured,
    /// or [`ZenserpError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ZenserpError> {
        let api_key = config
            .zenserp_api_key
            .as_deref()
            .ok_or(ZenserpError::MissingApiKey)?;
        Self::with_base_url(api_key, config.upstream_timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client pointed at the production Zenserp API.
    ///
    /// # Errors
    ///
    /// Returns [`ZenserpError::MissingApiKey`] if `api_key` is empty, or
    /// [`ZenserpError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ZenserpError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ZenserpError::MissingApiKey`] if `api_key` is empty,
    /// [`ZenserpError::InvalidBaseUrl`] if `base_url` is not a valid URL, or
    /// [`ZenserpError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ZenserpError> {
        if api_key.is_empty() {
            return Err(ZenserpError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("shopscope/0.1 (product-search)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // relative joins and path rewrites behave the same for production and
        // mock-server URLs.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ZenserpError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
        })
    }

    /// Runs a shopping search for `query`.
    ///
    /// Calls the `/api/v2/search` endpoint with `tbm=shop` and returns the
    /// raw JSON body. The interesting part of the payload is the
    /// `shopping_results` array, which [`crate::normalize::summaries_from_search`]
    /// knows how to flatten.
    ///
    /// # Errors
    ///
    /// - [`ZenserpError::Status`] if Zenserp answers with a non-2xx status.
    /// - [`ZenserpError::Http`] on network failure or timeout.
    /// - [`ZenserpError::Deserialize`] if the response body is not JSON.
    pub async fn search(&self, query: &str) -> Result<serde_json::Value, ZenserpError> {
        let url = self.build_url(SEARCH_PATH, &[("q", query), ("tbm", "shop")]);
        self.request_json(&url).await
    }

    /// Fetches the detail record for a single product by its Zenserp
    /// product ID.
    ///
    /// Calls the `/api/v1/shopping` endpoint pinned to
    /// [`SHOPPING_LOCATION`] and returns the raw JSON body, including the
    /// `sellers` array that detail normalization draws prices from.
    ///
    /// # Errors
    ///
    /// - [`ZenserpError::Status`] if Zenserp answers with a non-2xx status.
    /// - [`ZenserpError::Http`] on network failure or timeout.
    /// - [`ZenserpError::Deserialize`] if the response body is not JSON.
    pub async fn fetch_product(&self, product_id: &str) -> Result<serde_json::Value, ZenserpError> {
        let url = self.build_url(
            SHOPPING_PATH,
            &[("product_id", product_id), ("location", SHOPPING_LOCATION)],
        );
        self.request_json(&url).await
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters.
    ///
    /// Clones the stored base URL, rewrites the path, and appends `apikey`
    /// plus any endpoint parameters via [`Url::query_pairs_mut`], ensuring
    /// all values are safely encoded.
    fn build_url(&self, path: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("apikey", &self.api_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request and parses the response body as JSON.
    ///
    /// Non-2xx responses are captured as [`ZenserpError::Status`] with the
    /// upstream body attached rather than being collapsed into a bare HTTP
    /// error, so the API layer can mirror what Zenserp said.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, ZenserpError> {
        tracing::debug!(path = url.path(), "requesting zenserp endpoint");
        // reqwest errors embed the full URL; strip it so the API key stays
        // out of logs and error bodies.
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;

        if !status.is_success() {
            tracing::warn!(
                path = url.path(),
                status = status.as_u16(),
                "zenserp returned an error status"
            );
            let details = match serde_json::from_str(&body) {
                Ok(json) => json,
                Err(_) => serde_json::Value::String(body),
            };
            return Err(ZenserpError::Status {
                status: status.as_u16(),
                body: details,
            });
        }

        // The error context carries the path only; the full URL would leak
        // the API key into logs.
        serde_json::from_str(&body).map_err(|e| ZenserpError::Deserialize {
            context: url.path().to_owned(),
            source: e,
        })
    }
}
